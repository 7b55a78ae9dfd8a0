pub mod llm_clients;
pub mod logging;
pub mod spreadsheet;
