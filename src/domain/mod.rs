// ============================================================
// DOMAIN LAYER
// ============================================================
// Value objects and static configuration for the import pipeline.
// No I/O, no async, no external services.

pub mod error;
mod extraction;
pub mod fields;
mod row;
mod shipment;
mod template;
mod validation;

pub use error::{AppError, Result};
pub use extraction::ExtractionConfig;
pub use row::{CanonicalRow, CellValue, HeaderMapping, MappingSource, RawRow, SheetTable};
pub use shipment::{ShipmentConfig, ShipmentRecord};
pub use template::{DataType, FieldMetadata, Requirement};
pub use validation::ValidationError;
