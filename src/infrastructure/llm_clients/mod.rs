pub mod openrouter;

use async_trait::async_trait;

use crate::domain::{ExtractionConfig, Result};

pub use openrouter::OpenRouterClient;

/// Chat-completion client used for header-mapping proposals. The response
/// is raw model text; parsing and sanitization happen in the application
/// layer where the proposal is treated as untrusted input.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    async fn generate(
        &self,
        config: &ExtractionConfig,
        system: &str,
        user: &str,
    ) -> Result<String>;
}
