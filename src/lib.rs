//! question-gen - 用 LLM 程序把查询拆解为可路由到工具的子问题
//!
//! 流程：prompt 模板 + 输出模板组装成程序 → 绑定工具列表和查询执行 →
//! 截取 `<Output>` 之后的文本 → 解析 JSON → 校验为 `SubQuestionList`。

pub mod error;
pub mod program;
pub mod prompts;
pub mod question_gen;

pub use error::{QuestionGenError, Result};
pub use program::{Program, ProgramOutput, TemplateProgram, Variables};
pub use question_gen::{GuidanceQuestionGenerator, SubQuestionList};

pub use model_provider::{CompletionOptions, LlmProvider};
pub use qgen_types::{QueryBundle, QuestionGenerator, SubQuestion, ToolMetadata};
