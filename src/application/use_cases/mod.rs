pub mod dimension_expander;
pub mod header_mapper;
pub mod mapping_proposal;
pub mod merge_resolver;
pub mod normalize;
pub mod order_import;
pub mod role_classifier;
pub mod row_validator;
pub mod shipment_builder;
pub mod template_parser;
