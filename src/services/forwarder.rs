//! Admin forwarder
//!
//! Reconstructs a completed submission from storage and relays it, with any
//! stored attachments, to the administrator account.

use std::path::Path;
use std::time::Duration;
use teloxide::{Bot, prelude::*, types::{ChatId, InputFile}};
use tracing::{info, warn};

use crate::models::Submission;
use crate::utils::errors::{MortalShopError, Result};
use super::attachments::AttachmentStore;
use super::submissions::SubmissionStore;

/// Pause between attachment sends so the Telegram rate limit is not hit
const ATTACHMENT_SEND_DELAY: Duration = Duration::from_millis(500);

/// What the forwarder managed to deliver
#[derive(Debug, Clone, Copy)]
pub struct ForwardSummary {
    pub files_sent: usize,
}

/// Relays persisted submissions to the single administrator account
#[derive(Clone)]
pub struct AdminForwarder {
    bot: Bot,
    admin_chat: ChatId,
    submissions: SubmissionStore,
    attachments: AttachmentStore,
}

impl AdminForwarder {
    pub fn new(
        bot: Bot,
        admin_id: i64,
        submissions: SubmissionStore,
        attachments: AttachmentStore,
    ) -> Self {
        Self {
            bot,
            admin_chat: ChatId(admin_id),
            submissions,
            attachments,
        }
    }

    /// Forward the user's saved submission to the administrator.
    ///
    /// A missing or unreadable record yields `SubmissionNotFound`, which the
    /// caller turns into a "fill out the form first" message. Individual
    /// attachment failures are logged and skipped; any other failure aborts
    /// without retrying the partial send.
    pub async fn forward(&self, user_id: i64) -> Result<ForwardSummary> {
        let submission = match self.submissions.load(user_id).await {
            Ok(Some(submission)) => submission,
            Ok(None) => return Err(MortalShopError::SubmissionNotFound { user_id }),
            Err(MortalShopError::Serialization(e)) => {
                // A corrupt record is as good as no record for forwarding.
                warn!(user_id = user_id, error = %e, "Submission record is corrupt");
                return Err(MortalShopError::SubmissionNotFound { user_id });
            }
            Err(e) => return Err(e),
        };

        self.bot
            .send_message(self.admin_chat, format_admin_message(&submission))
            .await?;

        let files = self.attachments.collect(user_id)?;
        if files.is_empty() {
            self.bot
                .send_message(self.admin_chat, "📭 The user attached no files")
                .await?;
            info!(user_id = user_id, "Submission forwarded without attachments");
            return Ok(ForwardSummary { files_sent: 0 });
        }

        let mut files_sent = 0;
        for path in &files {
            match self.send_attachment(path).await {
                Ok(()) => files_sent += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping undeliverable attachment");
                }
            }
            tokio::time::sleep(ATTACHMENT_SEND_DELAY).await;
        }

        if files_sent > 0 {
            self.bot
                .send_message(self.admin_chat, format!("✅ Total files sent: {files_sent}"))
                .await?;
        } else {
            self.bot
                .send_message(self.admin_chat, "📭 The user attached no files")
                .await?;
        }

        info!(user_id = user_id, files_sent = files_sent, total = files.len(), "Submission forwarded");
        Ok(ForwardSummary { files_sent })
    }

    async fn send_attachment(&self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment");
        let caption = format!("📎 File from user: {name}");

        if is_image(path) {
            self.bot
                .send_photo(self.admin_chat, InputFile::file(path))
                .caption(caption)
                .await?;
        } else {
            self.bot
                .send_document(self.admin_chat, InputFile::file(path))
                .caption(caption)
                .await?;
        }

        Ok(())
    }
}

/// Classify an attachment for delivery; unrecognized extensions go out as
/// generic documents.
fn is_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("jpg" | "jpeg" | "png" | "gif")
    )
}

/// Compose the structured admin notification for a submission.
fn format_admin_message(submission: &Submission) -> String {
    let user = &submission.user_info;
    let answers = &submission.answers;

    // Date plus minute is enough precision for the admin view.
    let timestamp: String = user
        .timestamp
        .as_deref()
        .unwrap_or("-")
        .chars()
        .take(16)
        .collect();

    format!(
        "📋 NEW MOUTHGUARD REQUEST\n\
         \n\
         👤 User: {first_name}\n\
         📛 Username: @{username}\n\
         🆔 User ID: {user_id}\n\
         ⏰ Submitted: {timestamp}\n\
         \n\
         📝 ANSWERS:\n\
         1. Mouthguard type: {capa_type}\n\
         2. Base color: {main_color}\n\
         3. Text color: {text_color}\n\
         4. Text: {text}\n\
         5. Additional elements: {additional_elements}\n\
         6. Element placement: {elements_position}\n\
         7. Age: {age}\n\
         8. Height: {height}\n\
         9. Font: {font}",
        first_name = field(&user.first_name),
        username = field(&user.username),
        user_id = user.user_id,
        timestamp = timestamp,
        capa_type = answers.capa_type.map(|c| c.label()).unwrap_or("-"),
        main_color = field(&answers.main_color),
        text_color = field(&answers.text_color),
        text = field(&answers.text),
        additional_elements = field(&answers.additional_elements),
        elements_position = field(&answers.elements_position),
        age = field(&answers.age),
        height = field(&answers.height),
        font = field(&answers.font),
    )
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;
    use crate::models::{Answers, CapaType, FilesInfo, UserInfo};

    fn forwarder(tmp: &TempDir) -> AdminForwarder {
        let attachments = AttachmentStore::new(tmp.path());
        let submissions = SubmissionStore::new(tmp.path(), attachments.clone());
        AdminForwarder::new(Bot::new("123456:TEST"), 99, submissions, attachments)
    }

    #[tokio::test]
    async fn test_forward_without_submission_fails_before_any_send() {
        let tmp = TempDir::new().unwrap();
        assert_matches!(
            forwarder(&tmp).forward(42).await,
            Err(MortalShopError::SubmissionNotFound { user_id: 42 })
        );
    }

    #[tokio::test]
    async fn test_forward_treats_corrupt_record_as_missing() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("user_42.json"), "{broken").unwrap();
        assert_matches!(
            forwarder(&tmp).forward(42).await,
            Err(MortalShopError::SubmissionNotFound { user_id: 42 })
        );
    }

    fn submission() -> Submission {
        Submission {
            user_info: UserInfo {
                user_id: 123,
                username: Some("champ".to_string()),
                first_name: Some("Ivan".to_string()),
                timestamp: Some("2025-03-04T10:20:30.123456+00:00".to_string()),
            },
            answers: Answers {
                capa_type: Some(CapaType::SingleLayer),
                main_color: Some("red".to_string()),
                text_color: Some("white".to_string()),
                text: Some("CHAMP".to_string()),
                additional_elements: Some("no".to_string()),
                elements_position: Some("centered on front".to_string()),
                age: Some("16".to_string()),
                height: Some("175".to_string()),
                font: Some("Arial".to_string()),
            },
            files_info: FilesInfo {
                has_files: false,
                files_count: 0,
                photos_dir: "user_123_photos".to_string(),
            },
        }
    }

    #[test]
    fn test_admin_message_truncates_timestamp_to_minute() {
        let text = format_admin_message(&submission());
        assert!(text.contains("⏰ Submitted: 2025-03-04T10:20\n"));
        assert!(!text.contains("10:20:30"));
    }

    #[test]
    fn test_admin_message_lists_answers_in_order() {
        let text = format_admin_message(&submission());
        let positions: Vec<usize> = [
            "1. Mouthguard type: single-layer",
            "2. Base color: red",
            "3. Text color: white",
            "4. Text: CHAMP",
            "5. Additional elements: no",
            "6. Element placement: centered on front",
            "7. Age: 16",
            "8. Height: 175",
            "9. Font: Arial",
        ]
        .iter()
        .map(|needle| text.find(needle).expect(needle))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_admin_message_handles_missing_fields() {
        let mut s = submission();
        s.user_info.timestamp = None;
        s.answers.font = None;
        let text = format_admin_message(&s);
        assert!(text.contains("⏰ Submitted: -"));
        assert!(text.contains("9. Font: -"));
    }

    #[test]
    fn test_image_classification_by_extension() {
        assert!(is_image(Path::new("a/main_color_1.jpg")));
        assert!(is_image(Path::new("a/b.JPEG")));
        assert!(is_image(Path::new("x.png")));
        assert!(is_image(Path::new("x.gif")));
        assert!(!is_image(Path::new("x.pdf")));
        assert!(!is_image(Path::new("x.bin")));
        assert!(!is_image(Path::new("no_extension")));
    }
}
