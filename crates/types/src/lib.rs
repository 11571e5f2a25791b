//! qgen-types - 子问题生成的公共类型
//!
//! 工具描述、查询、子问题，以及所有生成器共享的 trait。

mod generator;
mod models;

pub use generator::QuestionGenerator;
pub use models::{QueryBundle, SubQuestion, ToolMetadata};
