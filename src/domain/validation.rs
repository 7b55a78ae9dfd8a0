use serde::{Deserialize, Serialize};

/// One missing-field finding. Produced fresh on every validation pass and
/// surfaced wholesale so the user sees every problem at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 1-indexed row position in the imported sheet.
    pub row: usize,

    /// Canonical field name the finding is about.
    pub field: String,

    pub message: String,
}

impl ValidationError {
    pub fn missing(row: usize, field: &str) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: format!("Missing required field '{}'", field),
        }
    }
}
