// ============================================================
// ROW TYPES
// ============================================================
// Value objects flowing through the import pipeline. All are plain
// data passed by value; a CanonicalRow never points back at its RawRow.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single scalar cell as read from a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Render the cell as the string the pipeline works with.
    /// Whole numbers drop their trailing ".0" (spreadsheet readers hand
    /// integer-looking cells back as floats).
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            CellValue::Empty => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

/// One row as read from the source document: original headers paired with
/// cell values, in source column order. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    pub columns: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(columns: Vec<(String, CellValue)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value)
    }

    pub fn is_blank(&self) -> bool {
        self.columns.iter().all(|(_, value)| value.is_empty())
    }
}

/// One sheet as handed over by a document reader: ordered headers plus
/// ordered rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl SheetTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Where a header mapping came from. AI proposals are untrusted and pass
/// through the same sanitization as manual edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingSource {
    Dictionary,
    AiProposal,
    Manual,
}

/// Original header -> canonical field name (None = unmapped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderMapping {
    pub entries: HashMap<String, Option<String>>,
    pub source: MappingSource,
}

impl HeaderMapping {
    pub fn new(source: MappingSource) -> Self {
        Self {
            entries: HashMap::new(),
            source,
        }
    }

    pub fn target_for(&self, header: &str) -> Option<&str> {
        self.entries
            .get(header)
            .and_then(|target| target.as_deref())
    }

    /// Apply a manual edit. An empty target clears the mapping.
    pub fn set(&mut self, header: &str, target: Option<String>) {
        let target = target.filter(|t| !t.trim().is_empty());
        self.entries.insert(header.to_string(), target);
        self.source = MappingSource::Manual;
    }
}

/// Canonical field name -> resolved value. One per RawRow; fields absent
/// from the mapping are absent here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub values: HashMap<String, String>,
}

impl CanonicalRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(|s| s.as_str())
    }

    pub fn get_or_empty(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn set(&mut self, field: &str, value: String) {
        self.values.insert(field.to_string(), value);
    }

    pub fn has_content(&self, field: &str) -> bool {
        self.get(field).map(|v| !v.trim().is_empty()).unwrap_or(false)
    }
}
