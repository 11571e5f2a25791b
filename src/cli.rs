use clap::{Parser, Subcommand};
use std::path::PathBuf;

use question_gen::ToolMetadata;

#[derive(Parser)]
#[command(name = "qgen")]
#[command(about = "Decompose a query into sub-questions routed to tools", long_about = None)]
pub struct Cli {
    /// Config file (default: ./.qgen/config.toml, then ~/.qgen/config.toml)
    #[arg(short, long, global = true, env = "QGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate sub-questions for a query")]
    Generate {
        /// The user question to decompose
        query: String,

        /// TOML file with [[tools]] entries (name, description)
        #[arg(short = 'f', long)]
        tools_file: Option<PathBuf>,

        /// Inline tool, repeatable (e.g., --tool "uber_10k=Uber financials for 2021")
        #[arg(short = 't', long = "tool", value_parser = parse_tool)]
        tools: Vec<ToolMetadata>,

        /// Handlebars prompt template (overrides config)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Print the sub-questions as JSON
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Print the assembled program template")]
    Program {
        /// Handlebars prompt template (overrides config)
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

fn parse_tool(value: &str) -> Result<ToolMetadata, String> {
    let (name, description) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=DESCRIPTION, got '{}'", value))?;

    let name = name.trim();
    if name.is_empty() {
        return Err("tool name must not be empty".to_string());
    }
    Ok(ToolMetadata::new(name, description.trim()))
}
