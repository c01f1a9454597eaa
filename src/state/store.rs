//! Session store
//!
//! Encapsulated owner of all in-progress design sessions. The map is keyed
//! by user id and lives for the process lifetime only — completed sessions
//! are kept (terminal) until the user starts a new flow, which overwrites
//! them. Every mutation is a single read-modify-write under the lock, so
//! concurrent dispatch across users cannot lose updates; cross-user entries
//! never contend on anything but the map itself.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{CapaType, FlowUser};
use super::session::{DesignSession, DesignStep, FileSlot, TextOutcome};

/// Outcome of submitting a text answer, with a snapshot of the session
/// taken after the mutation (needed to persist on completion).
#[derive(Debug, Clone)]
pub struct SubmittedText {
    pub outcome: TextOutcome,
    pub session: DesignSession,
}

/// In-memory, process-lifetime store of per-user design sessions
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<i64, DesignSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a user's session, if any
    pub async fn get(&self, user_id: i64) -> Option<DesignSession> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    /// Whether the user is mid-flow (has a session in a non-terminal step)
    pub async fn has_active(&self, user_id: i64) -> bool {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .is_some_and(|s| s.is_active())
    }

    /// Start a design flow, overwriting any previous session for this user
    pub async fn start(&self, user: &FlowUser, capa_type: CapaType) -> DesignSession {
        let session = DesignSession::new(user, capa_type);
        debug!(user_id = user.user_id, capa_type = %capa_type, "Starting design session");
        self.sessions.write().await.insert(user.user_id, session.clone());
        session
    }

    /// Feed a text answer into the user's active session.
    ///
    /// Returns `None` when the user has no active session, in which case the
    /// message belongs to menu handling instead.
    pub async fn submit_text(&self, user_id: i64, text: &str) -> Option<SubmittedText> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&user_id).filter(|s| s.is_active())?;

        let outcome = session.apply_text(text, Utc::now());
        debug!(user_id = user_id, step = ?session.step, outcome = ?outcome, "Applied text answer");

        Some(SubmittedText {
            outcome,
            session: session.clone(),
        })
    }

    /// Which file slot the user's current step accepts, if any
    pub async fn expected_file_slot(&self, user_id: i64) -> Option<FileSlot> {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .filter(|s| s.is_active())
            .and_then(|s| s.expected_file_slot())
    }

    /// Record a stored attachment reference, re-validating that the session
    /// still expects a file in this slot before mutating.
    pub async fn record_attachment(
        &self,
        user_id: i64,
        slot: FileSlot,
        reference: String,
    ) -> Option<DesignStep> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&user_id)?;

        if session.expected_file_slot() != Some(slot) {
            return None;
        }

        Some(session.record_file(slot, reference))
    }

    /// Roll a completed-but-unpersisted session back to the font question
    pub async fn reopen_font_step(&self, user_id: i64) {
        if let Some(session) = self.sessions.write().await.get_mut(&user_id) {
            session.reopen_font_step();
        }
    }

    /// Drop the user's session entirely (reset to non-flow mode)
    pub async fn clear(&self, user_id: i64) {
        self.sessions.write().await.remove(&user_id);
    }
}
