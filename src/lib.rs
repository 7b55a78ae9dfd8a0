//! refurbdesk import core.
//!
//! The reconciliation and shipment-document pipeline behind the
//! refurbdesk console: spreadsheet ingestion, header-to-canonical-field
//! mapping (dictionary, AI-proposed or manual), per-field merge
//! resolution, category dimension expansion, required-field validation
//! and carrier XML synthesis. The surrounding console (screens, storage,
//! messaging) lives elsewhere and talks to this crate through plain
//! value objects.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{default_mapping, import_orders, parse_template, synthesize, ImportOutcome};
pub use domain::{
    AppError, CanonicalRow, CellValue, ExtractionConfig, FieldMetadata, HeaderMapping,
    MappingSource, RawRow, Result, SheetTable, ShipmentConfig, ShipmentRecord, ValidationError,
};
