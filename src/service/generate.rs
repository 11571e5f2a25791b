use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::service::setup::{build_generator, load_tools};
use crate::ui::Output;
use question_gen::{QueryBundle, ToolMetadata};

pub struct GenerateOptions {
    pub query: String,
    pub tools_file: Option<PathBuf>,
    pub tools: Vec<ToolMetadata>,
    pub template: Option<PathBuf>,
    pub json: bool,
    pub config: Option<PathBuf>,
}

pub fn generate(options: GenerateOptions) -> Result<()> {
    let GenerateOptions {
        query,
        tools_file,
        tools,
        template,
        json,
        config,
    } = options;
    let output = Output::new();

    let tools = load_tools(tools_file.as_deref(), tools)?;
    let generator = build_generator(&output, config.as_deref(), template.as_deref())?;

    output.tools(&tools);
    if tools.is_empty() {
        output.note("No tools given, the model has nothing to route sub-questions to");
    }
    output.status("Generating", "sub-questions");

    let sub_questions = generator.generate(&tools, &QueryBundle::new(query))?;

    if json {
        let rendered = serde_json::to_string_pretty(&sub_questions)
            .context("Failed to serialize sub-questions")?;
        println!("{}", rendered);
    } else {
        output.sub_questions(&sub_questions);
    }

    output.finish(&format!("{} sub-questions", sub_questions.len()));
    Ok(())
}
