//! OpenAI 兼容格式 Completion 实现（供 OpenAI、Ollama 使用）

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::traits::{CompletionOptions, LlmProvider};

pub struct OpenaiCompatibleCompletion {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    extra: Map<String, Value>,
}

/// 请求体中由客户端自己填写的字段，不允许被附加参数覆盖
const RESERVED_FIELDS: [&str; 5] = ["model", "prompt", "max_tokens", "temperature", "stop"];

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenaiCompatibleCompletion {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;

        tracing::debug!(
            "Created {} completion provider: model={}, base_url={}",
            config.provider_name,
            config.model,
            config.base_url
        );

        let mut extra = config.extra.clone();
        for field in RESERVED_FIELDS {
            if extra.remove(field).is_some() {
                tracing::warn!("Ignoring extra request parameter '{}'", field);
            }
        }

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            extra,
        })
    }
}

impl LlmProvider for OpenaiCompatibleCompletion {
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stop: (!options.stop.is_empty()).then_some(options.stop.as_slice()),
            extra: &self.extra,
        };

        let url = format!("{}/completions", self.base_url);

        let mut builder = self.client.post(&url).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder.send().context("Failed to send LLM request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            tracing::error!("Completion API error ({}): {}", status, error_text);
            anyhow::bail!("LLM API error ({}): {}", status, error_text);
        }

        let completion: CompletionResponse =
            response.json().context("Failed to parse LLM response")?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .context("LLM response has no choices")
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_empty_stop() {
        let request = CompletionRequest {
            model: "m",
            prompt: "p",
            max_tokens: 16,
            temperature: 0.0,
            stop: None,
            extra: &Map::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("stop").is_none());
        assert_eq!(value["max_tokens"], 16);
    }

    #[test]
    fn test_parse_completion_response() {
        let body = r#"{"id":"cmpl-1","choices":[{"text":" {\"a\": 1}","index":0}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].text, " {\"a\": 1}");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let provider = OpenaiCompatibleCompletion::new(&ProviderConfig {
            provider_name: "openai".to_string(),
            api_key: "sk-test".to_string(),
            base_url: "https://api.openai.com/v1/".to_string(),
            model: "gpt-3.5-turbo-instruct".to_string(),
            ..ProviderConfig::default()
        })
        .unwrap();
        assert_eq!(provider.base_url, "https://api.openai.com/v1");
        assert_eq!(provider.model(), "gpt-3.5-turbo-instruct");
    }

    #[test]
    fn test_extra_parameters_in_request() {
        let mut extra = Map::new();
        extra.insert("top_p".to_string(), Value::from(0.9));
        extra.insert("model".to_string(), Value::from("other"));

        let provider = OpenaiCompatibleCompletion::new(&ProviderConfig {
            provider_name: "ollama".to_string(),
            base_url: "http://localhost:11434/v1".to_string(),
            model: "llama3".to_string(),
            extra,
            ..ProviderConfig::default()
        })
        .unwrap();

        let request = CompletionRequest {
            model: &provider.model,
            prompt: "p",
            max_tokens: 16,
            temperature: 0.0,
            stop: None,
            extra: &provider.extra,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["top_p"], 0.9);
        assert_eq!(value["model"], "llama3");
    }
}
