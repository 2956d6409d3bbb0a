use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

mod checks;
mod cli;
mod config;
mod constraint;
mod jobs;
mod manifest;
mod matrix;
mod output;
mod project;
mod requirements;
mod versions;

use cli::RootArgs;
use output::{error_annotation, GithubOutputFile, OutputSink, PlainValue, WorkflowCommand};
use project::ProjectPaths;
use requirements::RequirementsMode;

fn main() -> ExitCode {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            println!("{}", error_annotation(&format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout is reserved for workflow commands.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn run(args: RootArgs) -> Result<()> {
    let mode = RequirementsMode::from_arg(args.require_checks.as_deref());
    let paths = ProjectPaths::new(args.project_dir);
    let matrix = matrix::build_matrix(mode, &paths)?;
    let json = matrix.to_json()?;
    tracing::info!("Matrix: {json}");

    let mut sink: Box<dyn OutputSink> = if args.stdout {
        Box::new(PlainValue::new(std::io::stdout()))
    } else if let Some(path) = args.github_output {
        Box::new(GithubOutputFile::new(path))
    } else {
        Box::new(WorkflowCommand::new(std::io::stdout()))
    };
    sink.set_output(output::MATRIX_OUTPUT, &json)
}
