use anyhow::{Context, Result};
use model_provider::ProviderConfig as ModelProviderConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// 服务类型（embed/rerank 仅用于兼容共享的 providers.toml）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Llm,
    Embed,
    Rerank,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceType::Llm => "llm",
            ServiceType::Embed => "embed",
            ServiceType::Rerank => "rerank",
        };
        f.write_str(name)
    }
}

/// 服务配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub base_url: String,
    pub model: String,
    /// 其余键作为附加请求参数
    #[serde(flatten)]
    pub extra: HashMap<String, toml::Value>,
}

/// Provider 配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(flatten)]
    pub services: HashMap<String, ServiceConfig>,
}

/// 所有 Provider 配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(flatten)]
    providers: HashMap<String, ProviderConfig>,
}

impl ProvidersConfig {
    /// 加载 providers.toml
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "Providers configuration not found at: {}\nPlease create it from providers.example.toml",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(config_path).with_context(|| {
            format!("Failed to read providers config: {}", config_path.display())
        })?;

        let config: Self = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse providers config: {}",
                config_path.display()
            )
        })?;

        tracing::debug!("Loaded providers config from: {}", config_path.display());
        tracing::debug!(
            "Available providers: {:?}",
            config.providers.keys().collect::<Vec<_>>()
        );

        Ok(config)
    }

    /// 获取服务配置（如 "openai.llm"），并检查服务类型
    pub fn get_service(&self, reference: &str, expected: ServiceType) -> Result<ResolvedService> {
        let (provider_name, service_name) = reference.split_once('.').with_context(|| {
            format!(
                "Invalid service reference: '{}'. Expected format: 'provider.service' (e.g., 'openai.llm')",
                reference
            )
        })?;

        let provider = self
            .providers
            .get(provider_name)
            .with_context(|| format!("Provider '{}' not found in providers.toml", provider_name))?;

        let service = provider.services.get(service_name).with_context(|| {
            format!(
                "Service '{}' not found in provider '{}'",
                service_name, provider_name
            )
        })?;

        if service.service_type != expected {
            anyhow::bail!(
                "Service '{}' has type '{}', expected '{}'",
                reference,
                service.service_type,
                expected
            );
        }

        Ok(ResolvedService {
            provider_name: provider_name.to_string(),
            api_key: provider.api_key.clone(),
            base_url: service.base_url.clone(),
            model: service.model.clone(),
            extra: service.extra.clone(),
        })
    }
}

/// 解析后的服务配置
#[derive(Debug, Clone)]
pub struct ResolvedService {
    pub provider_name: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub extra: HashMap<String, toml::Value>,
}

impl ResolvedService {
    /// 转换为 model-provider 的配置（可覆盖模型名）
    pub fn to_provider_config(&self, model_override: Option<&str>) -> Result<ModelProviderConfig> {
        let extra = match serde_json::to_value(&self.extra).with_context(|| {
            format!("Invalid extra parameters for provider '{}'", self.provider_name)
        })? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        Ok(ModelProviderConfig {
            provider_name: self.provider_name.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: model_override.unwrap_or(&self.model).to_string(),
            extra,
        })
    }
}
