//! Decide which families of checks a change requires.
//!
//! In conditional mode the changed-file list is folded through a fixed set of
//! path rules; a flag, once enabled, is never disabled again.
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Which check families must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub code_checks: bool,
    pub doc_linting: bool,
}

impl Requirements {
    pub const ALL: Requirements = Requirements {
        code_checks: true,
        doc_linting: true,
    };

    pub const NONE: Requirements = Requirements {
        code_checks: false,
        doc_linting: false,
    };

    fn union(self, other: Requirements) -> Requirements {
        Requirements {
            code_checks: self.code_checks || other.code_checks,
            doc_linting: self.doc_linting || other.doc_linting,
        }
    }
}

/// How requirements are derived for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementsMode {
    /// Run every check the package supports.
    Unconditional,
    /// Only run checks that the changed files call for.
    Conditional,
}

impl RequirementsMode {
    /// Map the optional first CLI argument to a mode; only the literal
    /// `false` selects conditional evaluation.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("false") => RequirementsMode::Conditional,
            _ => RequirementsMode::Unconditional,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Family {
    Code,
    Docs,
}

struct DiffRule {
    pattern: Regex,
    family: Family,
    reason: &'static str,
}

impl DiffRule {
    fn new(pattern: &str, family: Family, reason: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("diff rule pattern is valid"),
            family,
            reason,
        }
    }
}

fn diff_rules() -> Vec<DiffRule> {
    vec![
        DiffRule::new(r"\.php$", Family::Code, "presence of PHP files in diff"),
        DiffRule::new(
            r"(phpunit|phpcs|psalm)\.xml(\.dist)?$",
            Family::Code,
            "presence of check config files in diff",
        ),
        DiffRule::new(
            r"composer\.(json|lock)$",
            Family::Code,
            "presence of composer files in diff",
        ),
        DiffRule::new(
            r"(^|[/\\])(\.github|src|lib|tests?|config|bin)[/\\]",
            Family::Code,
            "file existing in source directory",
        ),
        DiffRule::new(
            r"(^mkdocs\.yml$|docs?/book/.*\.md$)",
            Family::Docs,
            "documentation existing in diff",
        ),
    ]
}

/// Requirements implied by a single changed path.
fn requirements_for_path(rules: &[DiffRule], path: &str) -> Requirements {
    rules
        .iter()
        .filter(|rule| rule.pattern.is_match(path))
        .fold(Requirements::NONE, |acc, rule| match rule.family {
            Family::Code => {
                tracing::info!(file = path, "- Enabling code checks due to {}", rule.reason);
                acc.union(Requirements {
                    code_checks: true,
                    doc_linting: false,
                })
            }
            Family::Docs => {
                tracing::info!(file = path, "- Enabling markdown linting due to {}", rule.reason);
                acc.union(Requirements {
                    code_checks: false,
                    doc_linting: true,
                })
            }
        })
}

/// Resolve requirements for `mode`, consulting `diff` only when conditional.
pub fn resolve_requirements(mode: RequirementsMode, diff: &[String]) -> Requirements {
    match mode {
        RequirementsMode::Unconditional => Requirements::ALL,
        RequirementsMode::Conditional => {
            let rules = diff_rules();
            diff.iter().fold(Requirements::NONE, |acc, path| {
                acc.union(requirements_for_path(&rules, path))
            })
        }
    }
}

/// Read the newline-delimited changed-file list; a missing file is an empty diff.
pub fn read_diff(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no diff file present");
        return Ok(Vec::new());
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(parse_diff(&String::from_utf8_lossy(&bytes)))
}

fn parse_diff(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "requirements_tests.rs"]
mod tests;
