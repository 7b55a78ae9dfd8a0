//! Product-template ingestion.
//!
//! Marketplace template workbooks carry a data sheet with a fixed
//! two-header-row layout (row 1 display labels, row 2 field codes, any
//! further rows sample values), an optional free-form metadata sheet
//! (resolved through the role classifier) and an optional reference-values
//! sheet (one column per field code, cells listing permitted values).
//! Output is one FieldMetadata per data-sheet column, ready for
//! persistence and for driving the manual-mapping UI.

use std::collections::HashMap;

use tracing::info;

use crate::application::use_cases::role_classifier::{ColumnRoles, RoleClassifier};
use crate::domain::fields::collapse_header;
use crate::domain::{AppError, DataType, FieldMetadata, Result, SheetTable};

/// Sample values inspected per column for value-type inference.
const MAX_TYPE_SAMPLES: usize = 20;

pub fn parse_template(
    data: &SheetTable,
    metadata: Option<&SheetTable>,
    reference_values: Option<&SheetTable>,
) -> Result<Vec<FieldMetadata>> {
    if data.headers.is_empty() {
        return Err(AppError::MalformedSource(
            "Template data sheet has no label row".to_string(),
        ));
    }
    let code_row = data.rows.first().ok_or_else(|| {
        AppError::MalformedSource("Template data sheet has no code row".to_string())
    })?;

    let allowed = reference_values.map(allowed_value_table).unwrap_or_default();

    let classifier = metadata
        .map(|sheet| RoleClassifier::new(sheet.headers.clone(), sheet.rows.clone()));
    let roles = classifier.as_ref().map(|c| c.classify());

    let group = if data.name.trim().is_empty() {
        None
    } else {
        Some(data.name.trim().to_string())
    };

    let mut result = Vec::new();
    for (order, label) in data.headers.iter().enumerate() {
        let code = code_row
            .get(label)
            .map(|v| v.as_text())
            .unwrap_or_default();
        if code.is_empty() {
            continue;
        }

        let samples: Vec<String> = data
            .rows
            .iter()
            .skip(1)
            .take(MAX_TYPE_SAMPLES)
            .filter_map(|row| row.get(label))
            .map(|v| v.as_text())
            .collect();
        let sample_refs: Vec<&str> = samples.iter().map(|s| s.as_str()).collect();

        let allowed_values = allowed.get(&collapse_header(&code)).cloned();

        let required = match (&classifier, &roles) {
            (Some(c), Some(r)) => c.requirement_for(r, &code).is_required(),
            _ => false,
        };

        result.push(FieldMetadata {
            order,
            label: label.trim().to_string(),
            code: code.clone(),
            required,
            description: metadata
                .and_then(|sheet| roles.as_ref().and_then(|r| {
                    attribute_for(sheet, r, &code, r.description.as_deref())
                }))
                .unwrap_or_default(),
            example: metadata
                .and_then(|sheet| roles.as_ref().and_then(|r| {
                    attribute_for(sheet, r, &code, r.example.as_deref())
                }))
                .unwrap_or_default(),
            data_type: DataType::infer(&sample_refs, allowed_values.is_some()),
            allowed_values,
            group: group.clone(),
        });
    }

    if result.is_empty() {
        return Err(AppError::MalformedSource(
            "Template data sheet has no field codes".to_string(),
        ));
    }

    info!(
        fields = result.len(),
        sheet = %data.name,
        "parsed product template"
    );
    Ok(result)
}

/// Reference-values sheet: each column header is a field code, cells are
/// that field's permitted values.
fn allowed_value_table(sheet: &SheetTable) -> HashMap<String, Vec<String>> {
    let mut table: HashMap<String, Vec<String>> = HashMap::new();
    for header in &sheet.headers {
        let values: Vec<String> = sheet
            .rows
            .iter()
            .filter_map(|row| row.get(header))
            .map(|v| v.as_text())
            .filter(|v| !v.is_empty())
            .collect();
        if !values.is_empty() {
            table.insert(collapse_header(header), values);
        }
    }
    table
}

/// Read one metadata attribute (description or example) for a field code.
fn attribute_for(
    metadata: &SheetTable,
    roles: &ColumnRoles,
    code: &str,
    column: Option<&str>,
) -> Option<String> {
    let code_col = roles.code.as_deref()?;
    let column = column?;
    let wanted = code.trim().to_lowercase();
    metadata
        .rows
        .iter()
        .find(|row| {
            row.get(code_col)
                .map(|v| v.as_text().to_lowercase() == wanted)
                .unwrap_or(false)
        })
        .and_then(|row| row.get(column))
        .map(|v| v.as_text())
}
