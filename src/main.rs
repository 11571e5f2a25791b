mod cli;
mod config;
mod service;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use service::generate::GenerateOptions;
use ui::Output;

fn main() {
    init_tracing("warn");

    if let Err(e) = run() {
        Output::new().error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            query,
            tools_file,
            tools,
            template,
            json,
        } => service::generate::generate(GenerateOptions {
            query,
            tools_file,
            tools,
            template,
            json,
            config: cli.config,
        }),
        Commands::Program { template } => {
            service::program::program(cli.config.as_deref(), template.as_deref())
        }
    }
}

/// 日志输出到 stderr，级别由 RUST_LOG 控制
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
