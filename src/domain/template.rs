// ============================================================
// PRODUCT TEMPLATE TYPES
// ============================================================
// Metadata describing one canonical field of an uploaded marketplace
// product template. Constructed once per upload, read-only afterward
// except for requirement correction via the role classifier.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    Required,
    Optional,
}

impl Requirement {
    /// Classify a requirement-column token. Exact token matches first,
    /// then a substring fallback; anything unrecognized is optional.
    pub fn from_token(token: &str) -> Self {
        let t = token.trim().to_lowercase();
        match t.as_str() {
            "required" | "mandatory" | "r" | "yes" | "y" => return Requirement::Required,
            "optional" | "o" | "no" | "n" => return Requirement::Optional,
            "recommended" | "rec" => return Requirement::Optional,
            _ => {}
        }
        if t.contains("required") || t.contains("mandatory") {
            Requirement::Required
        } else {
            Requirement::Optional
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Requirement::Required)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Text,
    Number,
    Date,
    Enum,
}

impl DataType {
    /// Infer a value type from sampled values. An allowed-value set wins
    /// outright; otherwise majority-numeric or date-shaped samples decide.
    pub fn infer(samples: &[&str], has_allowed_values: bool) -> Self {
        if has_allowed_values {
            return DataType::Enum;
        }
        let non_empty: Vec<&str> = samples
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if non_empty.is_empty() {
            return DataType::Text;
        }
        let numeric = non_empty
            .iter()
            .filter(|s| s.replace(',', "").parse::<f64>().is_ok())
            .count();
        if numeric * 2 > non_empty.len() {
            return DataType::Number;
        }
        let date_like = non_empty.iter().filter(|s| looks_like_date(s)).count();
        if date_like * 2 > non_empty.len() {
            return DataType::Date;
        }
        DataType::Text
    }
}

// Cheap shape check: 2025-01-31, 31/01/2025, 01-31-2025.
fn looks_like_date(value: &str) -> bool {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    let seps = value.chars().filter(|c| *c == '-' || *c == '/').count();
    digits >= 6 && seps == 2 && value.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '/')
}

/// Per-field metadata of a parsed product template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Column position in the template data sheet (0-based).
    pub order: usize,

    /// Display label (data sheet header row 1).
    pub label: String,

    /// Field code (data sheet header row 2).
    pub code: String,

    pub required: bool,

    pub description: String,

    pub example: String,

    /// Permitted value set from the reference-values sheet, if any.
    pub allowed_values: Option<Vec<String>>,

    pub data_type: DataType,

    /// Sheet-level grouping label, when the template carries one.
    pub group: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_tokens() {
        assert_eq!(Requirement::from_token("Required"), Requirement::Required);
        assert_eq!(Requirement::from_token("Y"), Requirement::Required);
        assert_eq!(Requirement::from_token("recommended"), Requirement::Optional);
        assert_eq!(Requirement::from_token("No"), Requirement::Optional);
        // substring fallback
        assert_eq!(
            Requirement::from_token("field is mandatory in EU"),
            Requirement::Required
        );
        assert_eq!(Requirement::from_token("whatever"), Requirement::Optional);
    }

    #[test]
    fn test_data_type_inference() {
        assert_eq!(DataType::infer(&["12", "15", "9"], false), DataType::Number);
        assert_eq!(
            DataType::infer(&["2025-01-31", "2025-02-02"], false),
            DataType::Date
        );
        assert_eq!(DataType::infer(&["red", "blue"], true), DataType::Enum);
        assert_eq!(DataType::infer(&[], false), DataType::Text);
        assert_eq!(DataType::infer(&["ACME-1", "ACME-2"], false), DataType::Text);
    }
}
