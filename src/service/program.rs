use anyhow::Result;
use std::path::Path;

use crate::config::AppConfig;
use crate::service::setup::{locate_config, resolve_template};
use question_gen::prompts::DEFAULT_OUTPUT_MARKER;
use question_gen::question_gen::{assemble_template, DEFAULT_PROGRAM_SUB_QUESTION_PROMPT_TMPL};

/// 打印组装后的程序模板（不需要模型）
pub fn program(config_path: Option<&Path>, template_override: Option<&Path>) -> Result<()> {
    let config = locate_config(config_path)
        .map(|path| AppConfig::load_from_path(&path))
        .transpose()?;

    let template = resolve_template(template_override, config.as_ref())?;
    let marker = config
        .as_ref()
        .map(|c| c.output_marker.as_str())
        .unwrap_or(DEFAULT_OUTPUT_MARKER);

    let assembled = assemble_template(
        template
            .as_deref()
            .unwrap_or(&DEFAULT_PROGRAM_SUB_QUESTION_PROMPT_TMPL),
        marker,
    )?;

    println!("{}", assembled);
    Ok(())
}
