// ============================================================
// CSV READER
// ============================================================
// Parse CSV order exports with encoding and delimiter detection.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;

use crate::domain::{AppError, CellValue, RawRow, Result, SheetTable};

/// CSV reader for marketplace order exports
pub struct CsvReader {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse a CSV file and return it as a sheet table
    pub fn parse_file(&self, path: &Path) -> Result<SheetTable> {
        let content = read_with_encoding_detection(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "export".to_string());
        self.parse_content(&name, &content)
    }

    /// Parse CSV content from a string
    pub fn parse_content(&self, name: &str, content: &str) -> Result<SheetTable> {
        if content.trim().is_empty() {
            return Err(AppError::MalformedSource("CSV export is empty".to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(raw_row(&headers, &record));
        }

        Ok(SheetTable {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    /// Parse a CSV file with automatic delimiter detection
    pub fn parse_file_auto_detect(path: &Path) -> Result<SheetTable> {
        let content = read_with_encoding_detection(path)?;
        let sample: String = content.chars().take(4096).collect();
        let delimiter = detect_delimiter(&sample);
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "export".to_string());
        Self::default()
            .with_delimiter(delimiter)
            .parse_content(&name, &content)
    }
}

fn raw_row(headers: &[String], record: &StringRecord) -> RawRow {
    RawRow::new(
        headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let value = record.get(idx).unwrap_or("");
                (header.clone(), CellValue::from(value))
            })
            .collect(),
    )
}

/// UTF-8 first, then Windows-1252 (the usual culprit on legacy exports).
fn read_with_encoding_detection(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::IoError(format!("Failed to read file: {}", e)))?;

    if let Ok(content) = std::str::from_utf8(&bytes) {
        return Ok(content.to_string());
    }

    let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
    if !had_errors {
        return Ok(decoded.into_owned());
    }

    Ok(String::from_utf8_lossy(&bytes).to_string())
}

/// Detect delimiter from content (comma, semicolon, tab, pipe) by scoring
/// per-line counts for consistency and frequency.
pub fn detect_delimiter(content: &str) -> u8 {
    let candidates = [b',', b';', b'\t', b'|'];

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    for &delimiter in &candidates {
        let sample_lines: Vec<_> = content.lines().take(10).collect();
        if sample_lines.is_empty() {
            continue;
        }

        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        let avg = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
        let variance = counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / counts.len() as f32;

        let score = avg / (1.0 + variance.sqrt());
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let content = "Name,City,Zip\nAlice,Toronto,M5V 2T6\nBob,Ottawa,K1A 0A6";
        let table = CsvReader::new().parse_content("orders", content).unwrap();

        assert_eq!(table.headers, vec!["Name", "City", "Zip"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0].get("City").map(|v| v.as_text()),
            Some("Toronto".to_string())
        );
    }

    #[test]
    fn test_short_rows_pad_with_empty() {
        let content = "Name,City\nAlice";
        let table = CsvReader::new().parse_content("orders", content).unwrap();
        assert_eq!(table.rows[0].get("City"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_empty_content_is_fatal() {
        assert!(matches!(
            CsvReader::new().parse_content("orders", "  \n "),
            Err(AppError::MalformedSource(_))
        ));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(detect_delimiter("a|b|c\nd|e|f"), b'|');
    }
}
