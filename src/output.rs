//! Delivery of step outputs to the CI runner.
//!
//! The matrix is handed to an `OutputSink` so the build itself never touches
//! process-global state; `main` decides which sink applies.
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

pub const MATRIX_OUTPUT: &str = "matrix";

const MULTILINE_DELIMITER: &str = "__LAMINAS_CI_MATRIX_EOF__";

/// Receives named step outputs.
pub trait OutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Appends `name=value` records to the file named by `GITHUB_OUTPUT`.
pub struct GithubOutputFile {
    path: PathBuf,
}

impl GithubOutputFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl OutputSink for GithubOutputFile {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        file.write_all(output_record(name, value).as_bytes())
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

fn output_record(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        format!("{name}<<{MULTILINE_DELIMITER}\n{value}\n{MULTILINE_DELIMITER}\n")
    } else {
        format!("{name}={value}\n")
    }
}

/// Legacy `::set-output` workflow command written to a stream.
pub struct WorkflowCommand<W: Write> {
    out: W,
}

impl<W: Write> WorkflowCommand<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> OutputSink for WorkflowCommand<W> {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        writeln!(
            self.out,
            "::set-output name={}::{}",
            escape_property(name),
            escape_data(value)
        )
        .context("write workflow command")
    }
}

/// Writes only the value; for local runs and piping into other tools.
pub struct PlainValue<W: Write> {
    out: W,
}

impl<W: Write> PlainValue<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> OutputSink for PlainValue<W> {
    fn set_output(&mut self, _name: &str, value: &str) -> Result<()> {
        writeln!(self.out, "{value}").context("write output value")
    }
}

/// Format a fatal error as an `::error::` workflow annotation.
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_output_file_appends_records() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("github_output");
        std::fs::write(&path, "previous=1\n").expect("seed output file");

        let mut sink = GithubOutputFile::new(path.clone());
        sink.set_output(MATRIX_OUTPUT, r#"{"include":[]}"#)
            .expect("set output");

        let text = std::fs::read_to_string(&path).expect("read output file");
        assert_eq!(text, "previous=1\nmatrix={\"include\":[]}\n");
    }

    #[test]
    fn multiline_values_use_a_delimiter() {
        assert_eq!(
            output_record("matrix", "a\nb"),
            format!("matrix<<{MULTILINE_DELIMITER}\na\nb\n{MULTILINE_DELIMITER}\n")
        );
    }

    #[test]
    fn workflow_command_escapes_data() {
        let mut buffer = Vec::new();
        WorkflowCommand::new(&mut buffer)
            .set_output("matrix", "100%\ndone")
            .expect("set output");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "::set-output name=matrix::100%25%0Adone\n"
        );
    }

    #[test]
    fn plain_value_prints_only_the_value() {
        let mut buffer = Vec::new();
        PlainValue::new(&mut buffer)
            .set_output("matrix", "{}")
            .expect("set output");
        assert_eq!(buffer, b"{}\n");
    }

    #[test]
    fn error_annotation_is_single_line() {
        assert_eq!(
            error_annotation("parse composer.json\ncaused by"),
            "::error::parse composer.json%0Acaused by"
        );
    }
}
