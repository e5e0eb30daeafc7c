mod config;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::CheckConfig;
use exercise_core::{EditorStateManager, Workspace};
use exercise_core_completion::CompletionProvider;
use report::{Finding, Summary};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "exercise-check",
    version,
    about = "Quick bracket/semicolon checks and completions for exercise sources"
)]
struct Cli {
    /// TOML config file (`[lint]` table)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan files for unbalanced brackets and probable missing semicolons
    Lint {
        /// Files to scan
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print a JSON report instead of one line per marker
        #[arg(long)]
        json: bool,

        /// Exit non-zero on warnings too
        #[arg(long)]
        deny_warnings: bool,
    },

    /// List completion labels matching a typed prefix
    Complete {
        /// Text typed before the caret
        prefix: String,

        /// Show each item's documentation
        #[arg(long)]
        docs: bool,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CheckConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Lint {
            files,
            json,
            deny_warnings,
        } => lint(&config, &files, json, deny_warnings),
        Commands::Complete { prefix, docs } => complete(&prefix, docs),
    }
}

fn lint(
    config: &CheckConfig,
    files: &[PathBuf],
    json: bool,
    deny_warnings: bool,
) -> Result<ExitCode> {
    let processor = config
        .lint
        .build_processor()
        .context("invalid [lint] configuration")?;
    let owner = processor.owner().clone();

    let mut workspace = Workspace::new();
    let mut opened = Vec::with_capacity(files.len());
    for path in files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let uri = path.display().to_string();
        let id = workspace
            .open_buffer(Some(uri.clone()), &text)
            .with_context(|| format!("{uri} given twice"))?;
        workspace
            .buffer_mut(id)?
            .attach_processor(Box::new(processor.clone()));
        opened.push((uri, id));
    }

    let mut findings = Vec::new();
    let mut summary = Summary::default();
    for (uri, id) in &opened {
        let diagnostics = workspace.buffer(*id)?.diagnostics(&owner);
        tracing::debug!(file = %uri, count = diagnostics.len(), "linted");
        summary.add(diagnostics);
        findings.extend(diagnostics.iter().map(|d| Finding::new(uri, d)));
    }

    if json {
        println!("{}", report::to_json(&findings, summary)?);
    } else {
        for finding in &findings {
            println!("{}", finding.to_line());
        }
        eprintln!(
            "{} file(s): {} error(s), {} warning(s)",
            summary.files, summary.errors, summary.warnings
        );
    }

    Ok(if summary.failed(deny_warnings) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn complete(prefix: &str, docs: bool) -> Result<ExitCode> {
    let provider = CompletionProvider::java()?;
    let state = EditorStateManager::new(prefix);
    let list = provider.complete(&state, state.line_index().char_count());

    for item in &list.items {
        if docs {
            println!("{}\t{}", item.label, item.documentation);
        } else {
            println!("{}", item.label);
        }
    }

    Ok(if list.items.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
