use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use tracing::debug;

use crate::domain::{AppError, CellValue, RawRow, Result, SheetTable};

/// Read every sheet of a workbook. An empty workbook is a fatal
/// malformed-source error; the import never starts.
pub fn read_workbook(path: &Path) -> Result<Vec<SheetTable>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| AppError::MalformedSource(format!("Failed to open workbook: {}", e)))?;

    let names = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(AppError::MalformedSource(
            "Workbook has no sheets".to_string(),
        ));
    }

    let mut sheets = Vec::new();
    for name in names {
        let range = workbook.worksheet_range(&name).map_err(|e| {
            AppError::ParseError(format!("Failed to read sheet '{}': {}", name, e))
        })?;
        sheets.push(table_from_range(&name, &range));
    }
    Ok(sheets)
}

/// Read one named sheet. Missing sheet is fatal for the import.
pub fn read_sheet(path: &Path, sheet_name: &str) -> Result<SheetTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| AppError::MalformedSource(format!("Failed to open workbook: {}", e)))?;

    let range = workbook.worksheet_range(sheet_name).map_err(|e| {
        AppError::MalformedSource(format!(
            "Required sheet '{}' could not be read: {}",
            sheet_name, e
        ))
    })?;

    Ok(table_from_range(sheet_name, &range))
}

fn table_from_range(name: &str, range: &calamine::Range<Data>) -> SheetTable {
    let mut rows_iter = range.rows();

    let headers: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();

    let rows: Vec<RawRow> = rows_iter
        .map(|row| {
            RawRow::new(
                headers
                    .iter()
                    .enumerate()
                    .filter(|(_, header)| !header.trim().is_empty())
                    .map(|(i, header)| {
                        let cell = row.get(i).unwrap_or(&Data::Empty);
                        (header.clone(), cell_value(cell))
                    })
                    .collect(),
            )
        })
        .collect();

    debug!(sheet = %name, headers = headers.len(), rows = rows.len(), "sheet read");
    SheetTable {
        name: name.to_string(),
        headers: headers
            .into_iter()
            .filter(|h| !h.trim().is_empty())
            .collect(),
        rows,
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => format!("{}", other),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        other => {
            let text = format!("{}", other);
            CellValue::from(text.as_str())
        }
    }
}
