//! Required-field validation.
//!
//! Checks each canonical row for the fields a shipment cannot do without
//! and returns every finding at once. Pure; safe to re-run after every
//! mapping or row edit.

use crate::domain::fields::REQUIRED_FIELDS;
use crate::domain::{CanonicalRow, ValidationError};

/// Validate one row. `row_index` is 1-indexed for display.
pub fn validate_row(row: &CanonicalRow, row_index: usize) -> Vec<ValidationError> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| !row.has_content(field))
        .map(|field| ValidationError::missing(row_index, field))
        .collect()
}

/// Validate a whole import. Errors accumulate across rows and are
/// returned wholesale, never raised one at a time.
pub fn validate_rows(rows: &[CanonicalRow]) -> Vec<ValidationError> {
    rows.iter()
        .enumerate()
        .flat_map(|(i, row)| validate_row(row, i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::{
        ADDRESS_LINE_1, CITY, CONTACT_NAME, COUNTRY, POSTAL_CODE, PROVINCE,
    };

    fn complete_row() -> CanonicalRow {
        let mut row = CanonicalRow::new();
        row.set(CONTACT_NAME, "Jane Doe".to_string());
        row.set(ADDRESS_LINE_1, "12 Main St".to_string());
        row.set(CITY, "Toronto".to_string());
        row.set(PROVINCE, "ON".to_string());
        row.set(POSTAL_CODE, "M5V 2T6".to_string());
        row.set(COUNTRY, "CA".to_string());
        row
    }

    #[test]
    fn test_complete_row_yields_no_errors() {
        assert!(validate_row(&complete_row(), 1).is_empty());
    }

    #[test]
    fn test_missing_fields_reported_per_row() {
        let mut row = complete_row();
        row.values.remove(CITY);
        row.set(POSTAL_CODE, "   ".to_string());

        let errors = validate_row(&row, 3);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.row == 3));
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&CITY));
        assert!(fields.contains(&POSTAL_CODE));
    }

    #[test]
    fn test_errors_clear_once_fields_filled() {
        let mut row = complete_row();
        row.values.remove(CITY);
        assert_eq!(validate_row(&row, 1).len(), 1);
        row.set(CITY, "Ottawa".to_string());
        assert!(validate_row(&row, 1).is_empty());
    }

    #[test]
    fn test_batch_validation_indexes_from_one() {
        let mut bad = complete_row();
        bad.values.remove(COUNTRY);
        let errors = validate_rows(&[complete_row(), bad]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 2);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut row = complete_row();
        row.values.remove(PROVINCE);
        let first = validate_rows(std::slice::from_ref(&row));
        let second = validate_rows(std::slice::from_ref(&row));
        assert_eq!(first, second);
    }
}
