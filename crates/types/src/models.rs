use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 工具描述（名称 + 说明），子问题据此路由
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
}

impl ToolMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// 用户查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryBundle {
    pub query_str: String,
    /// 检索阶段使用的替代 embedding 文本（生成子问题时不使用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_embedding_strs: Option<Vec<String>>,
}

impl QueryBundle {
    pub fn new(query_str: impl Into<String>) -> Self {
        Self {
            query_str: query_str.into(),
            custom_embedding_strs: None,
        }
    }
}

impl From<&str> for QueryBundle {
    fn from(query_str: &str) -> Self {
        Self::new(query_str)
    }
}

impl From<String> for QueryBundle {
    fn from(query_str: String) -> Self {
        Self::new(query_str)
    }
}

/// 单个子问题：可独立回答的问题 + 负责回答的工具
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubQuestion {
    pub sub_question: String,
    pub tool_name: String,
}

impl SubQuestion {
    pub fn new(sub_question: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            sub_question: sub_question.into(),
            tool_name: tool_name.into(),
        }
    }
}
