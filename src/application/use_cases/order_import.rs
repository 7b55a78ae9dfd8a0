//! Order import orchestration.
//!
//! One call per (sheet, mapping) pair: resolve every raw row onto the
//! canonical schema, expand category dimensions, then validate. Pure and
//! idempotent, so the UI can re-run it on every mapping or row edit.

use tracing::{debug, info};

use crate::application::use_cases::dimension_expander;
use crate::application::use_cases::header_mapper;
use crate::application::use_cases::merge_resolver;
use crate::application::use_cases::row_validator;
use crate::domain::{
    AppError, CanonicalRow, HeaderMapping, Result, SheetTable, ValidationError,
};

/// Result of one import pass. Validation findings are data, not errors;
/// the caller surfaces all of them at once. `ValidationError::row` counts
/// 1-indexed data rows of the source sheet, blanks included, so it lines
/// up with what the operator sees in the spreadsheet.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub rows: Vec<CanonicalRow>,
    pub errors: Vec<ValidationError>,
}

impl ImportOutcome {
    pub fn is_shippable(&self) -> bool {
        !self.rows.is_empty() && self.errors.is_empty()
    }
}

/// Dictionary mapping for a freshly read sheet, before any AI proposal or
/// manual edit.
pub fn default_mapping(sheet: &SheetTable) -> HeaderMapping {
    header_mapper::map_headers(&sheet.headers)
}

/// Run the resolve -> expand -> validate chain over an order sheet.
pub fn import_orders(sheet: &SheetTable, mapping: &HeaderMapping) -> Result<ImportOutcome> {
    if sheet.headers.is_empty() {
        return Err(AppError::MalformedSource(format!(
            "Sheet '{}' has no header row",
            sheet.name
        )));
    }

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    for (index, raw) in sheet.rows.iter().enumerate() {
        if raw.is_blank() {
            continue;
        }
        let row = dimension_expander::expand(&merge_resolver::resolve_row(raw, mapping));
        // report against the source sheet position, not the filtered list
        errors.extend(row_validator::validate_row(&row, index + 1));
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(AppError::MalformedSource(format!(
            "Sheet '{}' has no data rows",
            sheet.name
        )));
    }
    debug!(
        sheet = %sheet.name,
        rows = rows.len(),
        skipped = sheet.rows.len() - rows.len(),
        "resolved order rows"
    );
    info!(
        sheet = %sheet.name,
        rows = rows.len(),
        errors = errors.len(),
        "order import pass complete"
    );

    Ok(ImportOutcome { rows, errors })
}
