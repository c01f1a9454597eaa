//! End-to-end tests for the design flow core
//!
//! Drives the session store, attachment store and submission persister the
//! same way the message handlers do, without touching Telegram.

use assert_matches::assert_matches;
use tempfile::TempDir;
use teloxide::types::ChatId;

use MortalShop::models::{CapaType, FlowUser};
use MortalShop::services::{AttachmentStore, SubmissionStore};
use MortalShop::state::{DesignStep, FileSlot, SessionStore, TextOutcome};

fn flow_user(user_id: i64) -> FlowUser {
    FlowUser {
        user_id,
        username: Some("champ".to_string()),
        first_name: Some("Ivan".to_string()),
        chat_id: ChatId(user_id),
    }
}

fn stores(tmp: &TempDir) -> (SessionStore, AttachmentStore, SubmissionStore) {
    let sessions = SessionStore::new();
    let attachments = AttachmentStore::new(tmp.path());
    let submissions = SubmissionStore::new(tmp.path(), attachments.clone());
    (sessions, attachments, submissions)
}

/// Run the no-attachments answer sequence up to and including the font,
/// returning the final submit result.
async fn run_text_only_flow(
    sessions: &SessionStore,
    user_id: i64,
    capa_type: CapaType,
    answers: [&str; 7],
) -> MortalShop::state::SubmittedText {
    sessions.start(&flow_user(user_id), capa_type).await;

    let mut last = None;
    for answer in answers {
        last = sessions.submit_text(user_id, answer).await;
    }
    last.expect("flow should still be active")
}

#[tokio::test]
async fn test_documented_sequence_produces_documented_record() {
    let tmp = TempDir::new().unwrap();
    let (sessions, _, submissions) = stores(&tmp);

    let finished = run_text_only_flow(
        &sessions,
        123,
        CapaType::SingleLayer,
        ["red", "white", "CHAMP", "no", "centered on front", "16, 175", "Arial"],
    )
    .await;
    assert_matches!(finished.outcome, TextOutcome::Completed);

    submissions.save(&finished.session).await.unwrap();
    let record = submissions.load(123).await.unwrap().unwrap();

    assert_eq!(record.answers.capa_type, Some(CapaType::SingleLayer));
    assert_eq!(record.answers.main_color.as_deref(), Some("red"));
    assert_eq!(record.answers.text_color.as_deref(), Some("white"));
    assert_eq!(record.answers.text.as_deref(), Some("CHAMP"));
    assert_eq!(record.answers.additional_elements.as_deref(), Some("no"));
    assert_eq!(record.answers.elements_position.as_deref(), Some("centered on front"));
    assert_eq!(record.answers.age.as_deref(), Some("16"));
    assert_eq!(record.answers.height.as_deref(), Some("175"));
    assert_eq!(record.answers.font.as_deref(), Some("Arial"));
    assert!(!record.files_info.has_files);
    assert_eq!(record.files_info.files_count, 0);

    // The wire format uses the hyphenated type labels
    let raw = std::fs::read_to_string(tmp.path().join("user_123.json")).unwrap();
    assert!(raw.contains("\"single-layer\""));
}

#[tokio::test]
async fn test_flow_with_attachments_counts_files() {
    let tmp = TempDir::new().unwrap();
    let (sessions, attachments, submissions) = stores(&tmp);
    let user = flow_user(7);

    sessions.start(&user, CapaType::DoubleLayer).await;

    // Step 1 answered with a file instead of text
    let path = attachments
        .store(7, FileSlot::MainColor, b"background", Some("jpg"))
        .await
        .unwrap();
    let next = sessions
        .record_attachment(7, FileSlot::MainColor, format!("file:{}", path.display()))
        .await
        .unwrap();
    assert_eq!(next, DesignStep::AwaitingTextColor);

    sessions.submit_text(7, "white").await.unwrap();
    sessions.submit_text(7, "CHAMP").await.unwrap();

    // Yes branch: the next input must be a file
    let submitted = sessions.submit_text(7, "Yes").await.unwrap();
    assert_matches!(submitted.outcome, TextOutcome::Advanced(DesignStep::AwaitingAdditionalFile));
    assert_matches!(
        sessions.submit_text(7, "some text").await.unwrap().outcome,
        TextOutcome::FileExpected
    );

    std::thread::sleep(std::time::Duration::from_millis(10));
    let logo = attachments
        .store(7, FileSlot::Additional, b"logo", Some("png"))
        .await
        .unwrap();
    let next = sessions
        .record_attachment(7, FileSlot::Additional, format!("file:{}", logo.display()))
        .await
        .unwrap();
    assert_eq!(next, DesignStep::AwaitingElementsPosition);

    sessions.submit_text(7, "logo on the left").await.unwrap();
    sessions.submit_text(7, "21, 180").await.unwrap();
    let finished = sessions.submit_text(7, "Impact").await.unwrap();
    assert_matches!(finished.outcome, TextOutcome::Completed);

    let record = submissions.save(&finished.session).await.unwrap();
    assert!(record.files_info.has_files);
    assert_eq!(record.files_info.files_count, 2);
    assert_eq!(record.files_info.photos_dir, "user_7_photos");
    assert!(record.answers.main_color.unwrap().starts_with("file:"));
    assert!(record.answers.additional_elements.unwrap().starts_with("file:"));

    // Most recent upload comes first when forwarding
    let collected = attachments.collect(7).unwrap();
    assert_eq!(collected[0], logo);
    assert_eq!(collected[1], path);
}

#[tokio::test]
async fn test_second_flow_fully_overwrites_first_submission() {
    let tmp = TempDir::new().unwrap();
    let (sessions, _, submissions) = stores(&tmp);

    let first = run_text_only_flow(
        &sessions,
        42,
        CapaType::SingleLayer,
        ["red", "white", "CHAMP", "no", "front", "16, 175", "Arial"],
    )
    .await;
    submissions.save(&first.session).await.unwrap();

    let second = run_text_only_flow(
        &sessions,
        42,
        CapaType::DoubleLayer,
        ["black", "gold", "TIGER", "no", "both sides", "18, 182", "Gothic"],
    )
    .await;
    submissions.save(&second.session).await.unwrap();

    let record = submissions.load(42).await.unwrap().unwrap();
    assert_eq!(record.answers.capa_type, Some(CapaType::DoubleLayer));
    assert_eq!(record.answers.main_color.as_deref(), Some("black"));
    assert_eq!(record.answers.text.as_deref(), Some("TIGER"));
    assert_eq!(record.answers.font.as_deref(), Some("Gothic"));
    // No merge with the first flow's values anywhere
    let raw = std::fs::read_to_string(tmp.path().join("user_42.json")).unwrap();
    assert!(!raw.contains("CHAMP"));
    assert!(!raw.contains("Arial"));
}

#[tokio::test]
async fn test_completed_flow_returns_user_to_menu_mode() {
    let tmp = TempDir::new().unwrap();
    let (sessions, _, _) = stores(&tmp);

    let finished = run_text_only_flow(
        &sessions,
        9,
        CapaType::SingleLayer,
        ["red", "white", "CHAMP", "no", "front", "16, 175", "Arial"],
    )
    .await;
    assert_matches!(finished.outcome, TextOutcome::Completed);

    // Further messages no longer belong to the state machine
    assert!(!sessions.has_active(9).await);
    assert!(sessions.submit_text(9, "Merch").await.is_none());
}

#[tokio::test]
async fn test_malformed_age_height_keeps_user_on_the_question() {
    let tmp = TempDir::new().unwrap();
    let (sessions, _, _) = stores(&tmp);
    sessions.start(&flow_user(5), CapaType::SingleLayer).await;

    for answer in ["red", "white", "CHAMP", "no", "front"] {
        sessions.submit_text(5, answer).await.unwrap();
    }

    let rejected = sessions.submit_text(5, "sixteen 175").await.unwrap();
    assert_matches!(rejected.outcome, TextOutcome::InvalidAgeHeight);
    assert!(rejected.session.age.is_none());
    assert!(rejected.session.height.is_none());
    assert_eq!(rejected.session.step, DesignStep::AwaitingAgeHeight);

    let accepted = sessions.submit_text(5, "16, 175").await.unwrap();
    assert_matches!(accepted.outcome, TextOutcome::Advanced(DesignStep::AwaitingFont));
}
