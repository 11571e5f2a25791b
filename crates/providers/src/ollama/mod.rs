//! Ollama 本地 Completion（OpenAI 兼容格式，无需 api_key）

use anyhow::Result;

use crate::common::OpenaiCompatibleCompletion;
use crate::config::ProviderConfig;
use crate::traits::LlmProvider;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

pub fn create(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    if config.base_url.is_empty() {
        let config = ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            ..config.clone()
        };
        return Ok(Box::new(OpenaiCompatibleCompletion::new(&config)?));
    }
    Ok(Box::new(OpenaiCompatibleCompletion::new(config)?))
}
