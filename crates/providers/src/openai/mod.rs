//! OpenAI Completion

use anyhow::{Context, Result};

use crate::common::OpenaiCompatibleCompletion;
use crate::config::ProviderConfig;
use crate::traits::LlmProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// 默认补全模型
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-instruct";

pub fn create(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    if config.api_key.is_empty() {
        anyhow::bail!("Missing 'api_key' for openai provider");
    }
    if config.base_url.is_empty() {
        let config = ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            ..config.clone()
        };
        return Ok(Box::new(OpenaiCompatibleCompletion::new(&config)?));
    }
    Ok(Box::new(OpenaiCompatibleCompletion::new(config)?))
}

/// 从环境变量构建默认 OpenAI 补全后端
///
/// 读取 `OPENAI_API_KEY`（必填）与 `OPENAI_BASE_URL`（可选）
pub fn from_env(model: &str) -> Result<Box<dyn LlmProvider>> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY is not set; pass an explicit LLM or configure providers.toml")?;
    let base_url =
        std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    create(&ProviderConfig {
        provider_name: "openai".to_string(),
        api_key,
        base_url,
        model: model.to_string(),
        ..ProviderConfig::default()
    })
}
