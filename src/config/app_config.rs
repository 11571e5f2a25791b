use anyhow::{Context, Result};
use model_provider::CompletionOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::providers::{ProvidersConfig, ResolvedService, ServiceType};

/// 补全采样配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompletionConfig {
    /// 单次补全最大 token 数（默认: 512）
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 采样温度（默认: 0.0）
    #[serde(default)]
    pub temperature: f32,

    /// 停止序列（默认: 无）
    #[serde(default)]
    pub stop: Vec<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            stop: Vec::new(),
        }
    }
}

impl From<&CompletionConfig> for CompletionOptions {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            stop: config.stop.clone(),
        }
    }
}

fn default_max_tokens() -> u32 {
    512
}

fn default_output_marker() -> String {
    question_gen::prompts::DEFAULT_OUTPUT_MARKER.to_string()
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// LLM 服务引用（如 "openai.llm"）
    pub llm: String,

    /// 覆盖服务配置中的模型名（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// 自定义 prompt 模板路径（handlebars 风格，可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<PathBuf>,

    /// 模型答案区域标记（默认: "<Output>"）
    #[serde(default = "default_output_marker")]
    pub output_marker: String,

    /// 补全采样配置
    #[serde(default)]
    pub completion: CompletionConfig,
}

impl AppConfig {
    /// 全局 .qgen 目录：~/.qgen/
    pub fn global_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".qgen")
    }

    /// 本地 .qgen 目录：./.qgen/
    pub fn local_dir() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".qgen")
    }

    /// 查找配置文件：优先本地，其次全局；都不存在返回 None
    pub fn find_config_path() -> Option<PathBuf> {
        [Self::local_dir(), Self::global_dir()]
            .into_iter()
            .map(|dir| dir.join("config.toml"))
            .find(|path| path.exists())
    }

    /// 从指定路径加载配置文件
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration not found at: {}\nPlease create it from config.example.toml",
                path.display()
            );
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        tracing::debug!("Loaded app config from: {}", path.display());
        tracing::debug!("LLM: {}", config.llm);

        Ok(config)
    }

    /// 解析 LLM 服务（providers.toml 与 config.toml 位于同一目录）
    pub fn resolve_llm(&self, config_path: &Path) -> Result<ResolvedService> {
        let dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        let providers = ProvidersConfig::load_from_path(&dir.join("providers.toml"))?;
        providers.get_service(&self.llm, ServiceType::Llm)
    }

    /// 读取自定义 prompt 模板
    pub fn load_prompt_template(&self) -> Result<Option<String>> {
        self.prompt_template
            .as_deref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read prompt template: {}", path.display()))
            })
            .transpose()
    }
}
