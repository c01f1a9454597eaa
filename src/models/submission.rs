//! Persisted submission record
//!
//! One JSON record per user, overwritten whole each time a design flow
//! completes. The field layout matches the on-disk format consumed by the
//! shop's tooling, so renames here are breaking.

use serde::{Deserialize, Serialize};

/// Which design product the questionnaire was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapaType {
    #[serde(rename = "single-layer")]
    SingleLayer,
    #[serde(rename = "double-layer")]
    DoubleLayer,
}

impl CapaType {
    pub fn label(&self) -> &'static str {
        match self {
            CapaType::SingleLayer => "single-layer",
            CapaType::DoubleLayer => "double-layer",
        }
    }
}

impl std::fmt::Display for CapaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete persisted submission for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub user_info: UserInfo,
    pub answers: Answers,
    pub files_info: FilesInfo,
}

/// Identity block captured at flow start plus the completion timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    /// RFC 3339 completion timestamp
    pub timestamp: Option<String>,
}

/// The questionnaire answers in documented field order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answers {
    pub capa_type: Option<CapaType>,
    pub main_color: Option<String>,
    pub text_color: Option<String>,
    pub text: Option<String>,
    pub additional_elements: Option<String>,
    pub elements_position: Option<String>,
    pub age: Option<String>,
    pub height: Option<String>,
    pub font: Option<String>,
}

/// Attachment summary, recomputed by scanning storage at save time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesInfo {
    pub has_files: bool,
    pub files_count: usize,
    pub photos_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capa_type_wire_format() {
        assert_eq!(serde_json::to_string(&CapaType::SingleLayer).unwrap(), "\"single-layer\"");
        assert_eq!(serde_json::to_string(&CapaType::DoubleLayer).unwrap(), "\"double-layer\"");

        let parsed: CapaType = serde_json::from_str("\"single-layer\"").unwrap();
        assert_eq!(parsed, CapaType::SingleLayer);
    }
}
