mod args;
mod render;

use std::io::{IsTerminal, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use code_analyzer::{AnalyzerConfig, CodeAnalyzer};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::Cli;
use crate::render::render_report;

fn main() -> ExitCode {
    // A missing .env is fine; variables may come from the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let code = read_input(cli)?;

    let mut cfg = AnalyzerConfig::from_env();
    if let Some(corpus) = &cli.corpus {
        cfg = cfg.with_corpus_path(corpus);
    }
    let analyzer = CodeAnalyzer::new(cfg).context("failed to create analyzer")?;
    let envelope = analyzer
        .process(&code, cli.apply_fix)
        .context("analysis failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        let color = std::io::stdout().is_terminal();
        println!("{}", render_report(&envelope.analysis, color));
    }
    Ok(())
}

fn read_input(cli: &Cli) -> Result<String> {
    match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}
