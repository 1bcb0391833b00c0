//! `stencil` - structural checks for directive-based templates.

mod check;
mod cli;
mod render;

use anyhow::Context;
use clap::Parser;
use stencil_analysis::{classify_text, AnalysisConfig, Analyzer, DocumentId, Position};

use cli::{Cli, Command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(2);
        }
    }
}

/// Returns `false` when the checked templates contain errors.
fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    match cli.command {
        Command::Check {
            paths,
            format,
            config,
        } => {
            let config = match config {
                Some(path) => AnalysisConfig::from_file(&path)?,
                None => AnalysisConfig::load(&std::env::current_dir()?),
            };
            let mut analyzer = Analyzer::from_config(&config)?;
            let files = check::collect_files(&paths)?;
            let reports = check::check_files(&mut analyzer, &files)?;
            print!("{}", render::render(&reports, format)?);
            Ok(!reports.iter().any(check::FileReport::has_errors))
        }
        Command::Context {
            file,
            line,
            column,
            text_only,
        } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read template '{}'", file.display()))?;
            let position = Position::new(line - 1, column - 1);
            let classification = if text_only {
                classify_text(&text, position)
            } else {
                let config = AnalysisConfig::load(&std::env::current_dir()?);
                let mut analyzer = Analyzer::from_config(&config)?;
                let id = DocumentId::from(file.display().to_string());
                analyzer.analyze(&id, 1, &text);
                analyzer.classify(&id, &text, position)
            };
            println!("{}", render::render_context(&classification));
            Ok(true)
        }
    }
}
