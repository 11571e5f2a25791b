#[cfg(any(feature = "ollama", feature = "openai"))]
mod common;
mod config;
mod traits;

// 各供应商模块（feature gated）
#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "openai")]
pub mod openai;

pub use config::ProviderConfig;
pub use traits::{CompletionOptions, LlmProvider};

/// 创建 LLM Provider
pub fn create_llm_provider(config: &ProviderConfig) -> anyhow::Result<Box<dyn LlmProvider>> {
    match config.provider_name.as_str() {
        #[cfg(feature = "ollama")]
        "ollama" => ollama::create(config),
        #[cfg(feature = "openai")]
        "openai" => openai::create(config),
        other => anyhow::bail!("Unknown or disabled llm provider: {}", other),
    }
}
