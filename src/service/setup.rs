use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::ui::Output;
use model_provider::create_llm_provider;
use question_gen::question_gen::{assemble_program, DEFAULT_PROGRAM_SUB_QUESTION_PROMPT_TMPL};
use question_gen::{GuidanceQuestionGenerator, ToolMetadata};

/// 工具列表文件（TOML）
#[derive(Debug, Deserialize)]
struct ToolsFile {
    #[serde(default)]
    tools: Vec<ToolMetadata>,
}

/// 加载工具列表：文件中的工具在前，命令行 --tool 在后
pub fn load_tools(
    tools_file: Option<&Path>,
    inline: Vec<ToolMetadata>,
) -> Result<Vec<ToolMetadata>> {
    let mut tools = match tools_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read tools file: {}", path.display()))?;
            let parsed: ToolsFile = toml::from_str(&content)
                .with_context(|| format!("Failed to parse tools file: {}", path.display()))?;
            parsed.tools
        }
        None => Vec::new(),
    };
    tools.extend(inline);
    Ok(tools)
}

/// 确定配置文件路径：显式指定 > 本地 > 全局
pub fn locate_config(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(AppConfig::find_config_path)
}

/// 解析 prompt 模板：命令行 > 配置文件 > 内置
pub fn resolve_template(
    template_override: Option<&Path>,
    config: Option<&AppConfig>,
) -> Result<Option<String>> {
    if let Some(path) = template_override {
        let template = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt template: {}", path.display()))?;
        return Ok(Some(template));
    }

    match config {
        Some(config) => config.load_prompt_template(),
        None => Ok(None),
    }
}

/// 根据配置构建生成器；没有配置文件时使用内置默认值
pub fn build_generator(
    output: &Output,
    config_path: Option<&Path>,
    template_override: Option<&Path>,
) -> Result<GuidanceQuestionGenerator> {
    let Some(config_path) = locate_config(config_path) else {
        output.note("No config.toml found, using the default OpenAI backend");
        let template = resolve_template(template_override, None)?;
        return Ok(GuidanceQuestionGenerator::from_defaults(
            template.as_deref(),
            None,
        )?);
    };

    output.status("Loading", &config_path.display().to_string());
    let config = AppConfig::load_from_path(&config_path)?;
    let resolved = config.resolve_llm(&config_path)?;
    let llm = create_llm_provider(&resolved.to_provider_config(config.model.as_deref())?)?;
    output.status("Using", &format!("{} ({})", config.llm, llm.model()));

    let template = resolve_template(template_override, Some(&config))?;
    let program = assemble_program(
        template
            .as_deref()
            .unwrap_or(&DEFAULT_PROGRAM_SUB_QUESTION_PROMPT_TMPL),
        &config.output_marker,
        Arc::from(llm),
    )?
    .with_options((&config.completion).into());

    Ok(GuidanceQuestionGenerator::new(Arc::new(program)).with_output_marker(config.output_marker))
}
