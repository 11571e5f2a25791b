use anyhow::Result;
use async_trait::async_trait;

use crate::models::{QueryBundle, SubQuestion, ToolMetadata};

/// 子问题生成器的统一接口
///
/// 任何生成实现（LLM 程序、函数调用、规则）都应该实现这个 trait
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// 将查询拆解为可路由到工具的子问题（保持模型输出的顺序）
    fn generate(&self, tools: &[ToolMetadata], query: &QueryBundle) -> Result<Vec<SubQuestion>>;

    /// 异步入口，语义与 `generate` 相同
    async fn agenerate(
        &self,
        tools: &[ToolMetadata],
        query: &QueryBundle,
    ) -> Result<Vec<SubQuestion>>;
}
