// ============================================================
// SPREADSHEET READERS
// ============================================================
// Turn source documents (XLSX workbooks, CSV exports) into SheetTables
// the pure pipeline consumes. The only I/O in the crate besides the
// optional extraction call.

mod csv_reader;
mod xlsx_reader;

pub use csv_reader::CsvReader;
pub use xlsx_reader::{read_sheet, read_workbook};
