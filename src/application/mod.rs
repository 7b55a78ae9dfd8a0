pub mod use_cases;

pub use use_cases::order_import::{default_mapping, import_orders, ImportOutcome};
pub use use_cases::shipment_builder::synthesize;
pub use use_cases::template_parser::parse_template;
