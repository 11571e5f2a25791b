//! 基于 LLM 程序的子问题生成器

mod parse;

pub use parse::{extract_output, parse_json_markdown, parse_sub_question_list};

use std::sync::Arc;

use async_trait::async_trait;
use model_provider::LlmProvider;
use once_cell::sync::Lazy;
use qgen_types::{QueryBundle, QuestionGenerator, SubQuestion, ToolMetadata};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{QuestionGenError, Result};
use crate::program::{
    convert_to_handlebars, has_variable, output_template_for, Program, TemplateProgram, Variables,
};
use crate::prompts::{
    build_tools_text, DEFAULT_OUTPUT_MARKER, DEFAULT_SUB_QUESTION_PROMPT_TMPL,
    EXAMPLE_BOUNDARY_STOPS, QUERY_STR_VAR, TOOLS_STR_VAR,
};

/// handlebars 风格的默认子问题 prompt
pub static DEFAULT_PROGRAM_SUB_QUESTION_PROMPT_TMPL: Lazy<String> =
    Lazy::new(|| convert_to_handlebars(DEFAULT_SUB_QUESTION_PROMPT_TMPL));

/// 模型输出的根结构（用于生成输出模板和校验）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubQuestionList {
    pub sub_questions: Vec<SubQuestion>,
}

/// 子问题生成器：一次组装程序，多次调用
pub struct GuidanceQuestionGenerator {
    program: Arc<dyn Program>,
    output_marker: String,
}

impl GuidanceQuestionGenerator {
    /// 使用已构建的程序
    pub fn new(program: Arc<dyn Program>) -> Self {
        Self {
            program,
            output_marker: DEFAULT_OUTPUT_MARKER.to_string(),
        }
    }

    /// 替换输出标记（模板中必须包含该标记）
    pub fn with_output_marker(mut self, marker: impl Into<String>) -> Self {
        self.output_marker = marker.into();
        self
    }

    /// 组装默认程序
    ///
    /// `prompt_template_str` 为 handlebars 风格模板，`None` 时使用内置 prompt；
    /// `llm` 为 `None` 时使用 OpenAI 默认模型（需要 `openai` feature 与
    /// `OPENAI_API_KEY`）。
    pub fn from_defaults(
        prompt_template_str: Option<&str>,
        llm: Option<Arc<dyn LlmProvider>>,
    ) -> Result<Self> {
        let llm = match llm {
            Some(llm) => llm,
            None => default_llm()?,
        };
        let program = assemble_program(
            prompt_template_str.unwrap_or(&DEFAULT_PROGRAM_SUB_QUESTION_PROMPT_TMPL),
            DEFAULT_OUTPUT_MARKER,
            llm,
        )?;
        Ok(Self::new(Arc::new(program)))
    }

    /// 与 `from_defaults` 相同，但接收 `{var}` 格式模板
    pub fn from_format_template(
        prompt_template_str: &str,
        llm: Option<Arc<dyn LlmProvider>>,
    ) -> Result<Self> {
        Self::from_defaults(Some(&convert_to_handlebars(prompt_template_str)), llm)
    }

    pub fn program(&self) -> &dyn Program {
        self.program.as_ref()
    }

    /// 拆解查询为子问题（同步）
    pub fn generate(
        &self,
        tools: &[ToolMetadata],
        query: &QueryBundle,
    ) -> Result<Vec<SubQuestion>> {
        let variables = Variables::from([
            (TOOLS_STR_VAR.to_string(), build_tools_text(tools)?),
            (QUERY_STR_VAR.to_string(), query.query_str.clone()),
        ]);

        tracing::debug!("Generating sub-questions: tools={}", tools.len());
        let output = self.program.run(&variables)?;
        tracing::debug!("Program output: {}", output.text());

        let parsed = parse_sub_question_list(output.text(), &self.output_marker)?;
        tracing::debug!("Parsed {} sub-questions", parsed.sub_questions.len());

        Ok(parsed.sub_questions)
    }

    /// 异步入口：底层程序不支持异步，直接在当前任务内同步执行
    pub async fn agenerate(
        &self,
        tools: &[ToolMetadata],
        query: &QueryBundle,
    ) -> Result<Vec<SubQuestion>> {
        self.generate(tools, query)
    }
}

#[async_trait]
impl QuestionGenerator for GuidanceQuestionGenerator {
    fn generate(
        &self,
        tools: &[ToolMetadata],
        query: &QueryBundle,
    ) -> anyhow::Result<Vec<SubQuestion>> {
        Ok(GuidanceQuestionGenerator::generate(self, tools, query)?)
    }

    async fn agenerate(
        &self,
        tools: &[ToolMetadata],
        query: &QueryBundle,
    ) -> anyhow::Result<Vec<SubQuestion>> {
        Ok(GuidanceQuestionGenerator::agenerate(self, tools, query).await?)
    }
}

/// 拼接 prompt 与输出模板
pub fn assemble_template(prompt_template_str: &str, output_marker: &str) -> Result<String> {
    validate_template(prompt_template_str, output_marker)?;

    let output_str = output_template_for::<SubQuestionList>()?;
    Ok(format!("{}\n{}", prompt_template_str, output_str))
}

/// 组装模板并绑定模型
pub fn assemble_program(
    prompt_template_str: &str,
    output_marker: &str,
    llm: Arc<dyn LlmProvider>,
) -> Result<TemplateProgram> {
    let full_str = assemble_template(prompt_template_str, output_marker)?;

    tracing::debug!(
        "Assembled sub-question program: model={}, template_len={}",
        llm.model(),
        full_str.len()
    );

    Ok(TemplateProgram::new(full_str, llm).with_stop(EXAMPLE_BOUNDARY_STOPS))
}

fn validate_template(template: &str, output_marker: &str) -> Result<()> {
    for var in [TOOLS_STR_VAR, QUERY_STR_VAR] {
        if !has_variable(template, var) {
            return Err(QuestionGenError::InvalidTemplate(format!(
                "missing placeholder `{{{{{}}}}}`",
                var
            )));
        }
    }
    if !template.contains(output_marker) {
        return Err(QuestionGenError::InvalidTemplate(format!(
            "missing output marker `{}`",
            output_marker
        )));
    }
    Ok(())
}

#[cfg(feature = "openai")]
fn default_llm() -> Result<Arc<dyn LlmProvider>> {
    use anyhow::Context;
    use model_provider::openai;

    let llm = openai::from_env(openai::DEFAULT_MODEL)
        .context("Failed to configure default OpenAI backend")
        .map_err(|e| QuestionGenError::Config(format!("{:#}", e)))?;
    Ok(Arc::from(llm))
}

#[cfg(not(feature = "openai"))]
fn default_llm() -> Result<Arc<dyn LlmProvider>> {
    Err(QuestionGenError::MissingDependency {
        dependency: "default OpenAI backend",
        hint: "rebuild with `--features openai` or pass an explicit LLM",
    })
}
