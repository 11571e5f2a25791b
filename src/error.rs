//! 子问题生成的错误类型
//!
//! 所有失败都直接返回给调用方，生成器内部不做重试或降级。

/// 生成器统一错误
#[derive(Debug, thiserror::Error)]
pub enum QuestionGenError {
    /// 构建时缺少必要的集成（对应 feature 未启用）
    #[error("{dependency} is not available: {hint}")]
    MissingDependency {
        dependency: &'static str,
        hint: &'static str,
    },

    /// 默认后端无法配置
    #[error("configuration error: {0}")]
    Config(String),

    /// Prompt 模板不满足约束（缺少占位符、输出标记或变量未绑定）
    #[error("invalid prompt template: {0}")]
    InvalidTemplate(String),

    /// 工具列表无法渲染为 JSON
    #[error("failed to render tools text: {0}")]
    ToolsText(#[source] serde_json::Error),

    /// 无法从 JSON Schema 生成输出模板
    #[error("invalid output schema: {0}")]
    InvalidSchema(String),

    /// 程序输出中找不到输出标记
    #[error("output marker `{marker}` not found in program output")]
    MarkerNotFound { marker: String },

    /// 标记后的文本不是合法 JSON
    #[error("invalid JSON in program output: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        text: String,
    },

    /// JSON 合法但不符合 SubQuestionList 结构
    #[error("program output does not match the sub-question schema: {0}")]
    Validation(#[source] serde_json::Error),

    /// 模型调用失败
    #[error(transparent)]
    Program(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, QuestionGenError>;
