//! Design questionnaire session
//!
//! This module holds the per-user conversation state for the design flow:
//! the fixed sequence of question steps, the collected answers, and the
//! transition logic. All of it is pure — storage and Telegram I/O live in
//! the services layer — so the whole state machine is unit-testable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CapaType, FlowUser};

/// Steps of the design questionnaire, in flow order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignStep {
    AwaitingMainColor,
    AwaitingTextColor,
    AwaitingText,
    AwaitingAdditionalElements,
    AwaitingAdditionalFile,
    AwaitingElementsPosition,
    AwaitingAgeHeight,
    AwaitingFont,
    Completed,
}

/// Answer slots that accept an uploaded file instead of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot {
    MainColor,
    Additional,
}

impl FileSlot {
    /// Storage name prefix for attachments in this slot
    pub fn as_str(&self) -> &'static str {
        match self {
            FileSlot::MainColor => "main_color",
            FileSlot::Additional => "additional",
        }
    }
}

/// Result of feeding one text message into the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOutcome {
    /// Answer accepted, session moved to this step
    Advanced(DesignStep),
    /// Age/height pair was malformed; session untouched, re-prompt
    InvalidAgeHeight,
    /// A file is expected in the current step; session untouched
    FileExpected,
    /// Final answer accepted, timestamp stamped, ready to persist
    Completed,
}

/// In-memory record of one user's progress through the design flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSession {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub capa_type: CapaType,
    pub main_color: Option<String>,
    pub text_color: Option<String>,
    pub text: Option<String>,
    pub additional_elements: Option<String>,
    pub elements_position: Option<String>,
    pub age: Option<String>,
    pub height: Option<String>,
    pub font: Option<String>,
    pub step: DesignStep,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DesignSession {
    /// Create a fresh session at the first question
    pub fn new(user: &FlowUser, capa_type: CapaType) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            capa_type,
            main_color: None,
            text_color: None,
            text: None,
            additional_elements: None,
            elements_position: None,
            age: None,
            height: None,
            font: None,
            step: DesignStep::AwaitingMainColor,
            completed_at: None,
        }
    }

    /// Whether this session still routes incoming messages to the flow
    pub fn is_active(&self) -> bool {
        self.step != DesignStep::Completed
    }

    /// Feed a text answer into the current step.
    ///
    /// Invalid input never mutates the session: the caller re-prompts and
    /// the user stays on the same question.
    pub fn apply_text(&mut self, input: &str, now: DateTime<Utc>) -> TextOutcome {
        match self.step {
            DesignStep::AwaitingMainColor => {
                self.main_color = Some(input.to_string());
                self.advance(DesignStep::AwaitingTextColor)
            }
            DesignStep::AwaitingTextColor => {
                self.text_color = Some(input.to_string());
                self.advance(DesignStep::AwaitingText)
            }
            DesignStep::AwaitingText => {
                self.text = Some(input.to_string());
                self.advance(DesignStep::AwaitingAdditionalElements)
            }
            DesignStep::AwaitingAdditionalElements => {
                // Anything that is not an explicit yes counts as no,
                // the same way the buttons present the choice.
                if input.trim().eq_ignore_ascii_case("yes") {
                    self.additional_elements = Some("yes (file pending)".to_string());
                    self.advance(DesignStep::AwaitingAdditionalFile)
                } else {
                    self.additional_elements = Some("no".to_string());
                    self.advance(DesignStep::AwaitingElementsPosition)
                }
            }
            DesignStep::AwaitingAdditionalFile => TextOutcome::FileExpected,
            DesignStep::AwaitingElementsPosition => {
                self.elements_position = Some(input.to_string());
                self.advance(DesignStep::AwaitingAgeHeight)
            }
            DesignStep::AwaitingAgeHeight => match parse_age_height(input) {
                Some((age, height)) => {
                    self.age = Some(age);
                    self.height = Some(height);
                    self.advance(DesignStep::AwaitingFont)
                }
                None => TextOutcome::InvalidAgeHeight,
            },
            DesignStep::AwaitingFont => {
                self.font = Some(input.to_string());
                self.completed_at = Some(now);
                self.step = DesignStep::Completed;
                TextOutcome::Completed
            }
            DesignStep::Completed => TextOutcome::Completed,
        }
    }

    /// Which file slot the current step accepts, if any
    pub fn expected_file_slot(&self) -> Option<FileSlot> {
        match self.step {
            DesignStep::AwaitingMainColor => Some(FileSlot::MainColor),
            DesignStep::AwaitingAdditionalFile => Some(FileSlot::Additional),
            _ => None,
        }
    }

    /// Record a stored attachment reference in the slot's answer field
    /// and advance past it. Returns the step the session moved to.
    pub fn record_file(&mut self, slot: FileSlot, reference: String) -> DesignStep {
        match slot {
            FileSlot::MainColor => {
                self.main_color = Some(reference);
                self.step = DesignStep::AwaitingTextColor;
            }
            FileSlot::Additional => {
                self.additional_elements = Some(reference);
                self.step = DesignStep::AwaitingElementsPosition;
            }
        }
        self.step
    }

    /// Roll a failed completion back to the font question.
    ///
    /// Used when persisting the finished session fails: the step must not
    /// commit, so the user answers the final question again.
    pub fn reopen_font_step(&mut self) {
        self.font = None;
        self.completed_at = None;
        self.step = DesignStep::AwaitingFont;
    }

    fn advance(&mut self, next: DesignStep) -> TextOutcome {
        self.step = next;
        TextOutcome::Advanced(next)
    }
}

/// Parse the "Age, Height" answer: exactly two comma-separated,
/// non-empty tokens.
fn parse_age_height(input: &str) -> Option<(String, String)> {
    let mut parts = input.split(',');
    let age = parts.next()?.trim();
    let height = parts.next()?.trim();

    if parts.next().is_some() || age.is_empty() || height.is_empty() {
        return None;
    }

    Some((age.to_string(), height.to_string()))
}
