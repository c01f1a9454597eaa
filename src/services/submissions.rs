//! Submission persistence
//!
//! Writes a completed design session to the user's durable record and reads
//! it back for forwarding. One record per user, overwritten whole on each
//! completed flow; the files summary is recomputed by scanning the
//! attachment area at save time.

use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::models::{Answers, FilesInfo, Submission, UserInfo};
use crate::state::DesignSession;
use crate::utils::errors::Result;
use super::attachments::AttachmentStore;

/// Durable per-user submission records under the data directory
#[derive(Debug, Clone)]
pub struct SubmissionStore {
    data_dir: PathBuf,
    attachments: AttachmentStore,
}

impl SubmissionStore {
    pub fn new(data_dir: impl Into<PathBuf>, attachments: AttachmentStore) -> Self {
        Self {
            data_dir: data_dir.into(),
            attachments,
        }
    }

    fn record_path(&self, user_id: i64) -> PathBuf {
        self.data_dir.join(format!("user_{user_id}.json"))
    }

    /// Persist a completed session, overwriting any prior record.
    pub async fn save(&self, session: &DesignSession) -> Result<Submission> {
        let files_count = self.attachments.count(session.user_id).await?;

        let submission = Submission {
            user_info: UserInfo {
                user_id: session.user_id,
                username: session.username.clone(),
                first_name: session.first_name.clone(),
                timestamp: session.completed_at.map(|t| t.to_rfc3339()),
            },
            answers: Answers {
                capa_type: Some(session.capa_type),
                main_color: session.main_color.clone(),
                text_color: session.text_color.clone(),
                text: session.text.clone(),
                additional_elements: session.additional_elements.clone(),
                elements_position: session.elements_position.clone(),
                age: session.age.clone(),
                height: session.height.clone(),
                font: session.font.clone(),
            },
            files_info: FilesInfo {
                has_files: files_count > 0,
                files_count,
                photos_dir: AttachmentStore::photos_dir_name(session.user_id),
            },
        };

        tokio::fs::create_dir_all(&self.data_dir).await?;
        let serialized = serde_json::to_string_pretty(&submission)?;
        tokio::fs::write(self.record_path(session.user_id), serialized).await?;

        info!(user_id = session.user_id, files_count = files_count, "Submission saved");
        Ok(submission)
    }

    /// Load a user's submission. Returns `None` when no record exists;
    /// a corrupt record surfaces as a deserialization error.
    pub async fn load(&self, user_id: i64) -> Result<Option<Submission>> {
        let path = self.record_path(user_id);

        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(user_id = user_id, "No submission record found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use tempfile::TempDir;
    use teloxide::types::ChatId;

    use crate::models::{CapaType, FlowUser};
    use crate::state::FileSlot;
    use crate::utils::errors::MortalShopError;

    fn completed_session(user_id: i64) -> DesignSession {
        let user = FlowUser {
            user_id,
            username: Some("champ".to_string()),
            first_name: Some("Ivan".to_string()),
            chat_id: ChatId(user_id),
        };
        let mut session = DesignSession::new(&user, CapaType::SingleLayer);
        let now = Utc::now();
        for answer in ["red", "white", "CHAMP", "no", "centered on front", "16, 175", "Arial"] {
            session.apply_text(answer, now);
        }
        session
    }

    fn stores(tmp: &TempDir) -> (SubmissionStore, AttachmentStore) {
        let attachments = AttachmentStore::new(tmp.path());
        (SubmissionStore::new(tmp.path(), attachments.clone()), attachments)
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let (submissions, _) = stores(&tmp);

        let saved = submissions.save(&completed_session(5)).await.unwrap();
        assert_eq!(saved.answers.capa_type, Some(CapaType::SingleLayer));

        let loaded = submissions.load(5).await.unwrap().unwrap();
        assert_eq!(loaded.user_info.user_id, 5);
        assert_eq!(loaded.answers.main_color.as_deref(), Some("red"));
        assert_eq!(loaded.answers.additional_elements.as_deref(), Some("no"));
        assert_eq!(loaded.answers.age.as_deref(), Some("16"));
        assert_eq!(loaded.answers.height.as_deref(), Some("175"));
        assert_eq!(loaded.answers.font.as_deref(), Some("Arial"));
        assert!(loaded.user_info.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_files_info_counts_attachment_area() {
        let tmp = TempDir::new().unwrap();
        let (submissions, attachments) = stores(&tmp);

        let no_files = submissions.save(&completed_session(5)).await.unwrap();
        assert!(!no_files.files_info.has_files);
        assert_eq!(no_files.files_info.files_count, 0);
        assert_eq!(no_files.files_info.photos_dir, "user_5_photos");

        attachments.store(5, FileSlot::MainColor, b"a", Some("jpg")).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        attachments.store(5, FileSlot::Additional, b"b", Some("png")).await.unwrap();

        let with_files = submissions.save(&completed_session(5)).await.unwrap();
        assert!(with_files.files_info.has_files);
        assert_eq!(with_files.files_info.files_count, 2);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let tmp = TempDir::new().unwrap();
        let (submissions, _) = stores(&tmp);

        submissions.save(&completed_session(5)).await.unwrap();

        let mut second = completed_session(5);
        second.capa_type = CapaType::DoubleLayer;
        second.main_color = Some("black".to_string());
        submissions.save(&second).await.unwrap();

        let loaded = submissions.load(5).await.unwrap().unwrap();
        assert_eq!(loaded.answers.capa_type, Some(CapaType::DoubleLayer));
        assert_eq!(loaded.answers.main_color.as_deref(), Some("black"));
    }

    #[tokio::test]
    async fn test_load_missing_record() {
        let tmp = TempDir::new().unwrap();
        let (submissions, _) = stores(&tmp);
        assert!(submissions.load(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_record_errors() {
        let tmp = TempDir::new().unwrap();
        let (submissions, _) = stores(&tmp);

        std::fs::write(tmp.path().join("user_5.json"), "{not json").unwrap();
        assert_matches!(
            submissions.load(5).await,
            Err(MortalShopError::Serialization(_))
        );
    }
}
