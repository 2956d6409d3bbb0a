//! CLI argument parsing for the matrix generator.
//!
//! The CLI is intentionally thin: it only locates inputs and picks an output
//! sink, so the matrix derivation can be driven the same way from tests.
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "laminas-ci-matrix",
    version,
    about = "Build the CI job matrix for a PHP package",
    after_help = "Examples:\n  laminas-ci-matrix\n  laminas-ci-matrix false\n  laminas-ci-matrix --project-dir ./package --stdout"
)]
pub struct RootArgs {
    /// Pass "false" to only run checks required by the files in .laminas-ci-diff
    #[arg(value_name = "REQUIRE_CHECKS")]
    pub require_checks: Option<String>,

    /// Package root containing composer.json and QA configuration files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Output file receiving `matrix=<json>`
    #[arg(long, value_name = "PATH", env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Print the matrix JSON on stdout instead of setting a step output
    #[arg(long)]
    pub stdout: bool,

    /// Emit debug-level logs
    #[arg(long)]
    pub verbose: bool,
}
