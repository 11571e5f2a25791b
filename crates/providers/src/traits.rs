//! Provider Traits

use anyhow::Result;

/// 单次补全的采样参数
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    /// 停止序列（为空则不传）
    pub stop: Vec<String>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.0,
            stop: Vec::new(),
        }
    }
}

/// 文本补全 Provider Trait
///
/// 同步调用：实现方在当前线程阻塞直到模型返回
pub trait LlmProvider: Send + Sync {
    /// 对 prompt 做续写，返回模型生成的文本（不含 prompt）
    fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String>;

    /// 模型名称
    fn model(&self) -> &str;
}
