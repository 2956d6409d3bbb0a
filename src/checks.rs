//! QA check discovery.
//!
//! Checks are either listed explicitly in `.laminas-ci.json` or discovered by
//! probing the package for tool configuration files.
use crate::config::CheckSource;
use crate::project::ProjectPaths;
use crate::requirements::Requirements;

/// Which requirement flag gates a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Governed {
    Code,
    Docs,
}

impl Governed {
    fn enabled(self, requirements: &Requirements) -> bool {
        match self {
            Governed::Code => requirements.code_checks,
            Governed::Docs => requirements.doc_linting,
        }
    }
}

/// A filesystem predicate relative to the package root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    File(&'static str),
    Dir(&'static str),
}

impl Probe {
    fn matches(self, paths: &ProjectPaths) -> bool {
        match self {
            Probe::File(rel) => paths.exists(rel),
            Probe::Dir(rel) => paths.is_dir(rel),
        }
    }
}

/// A check command and the files whose presence turns it on.
#[derive(Debug, Clone, Copy)]
pub struct CheckDefinition {
    pub command: &'static str,
    pub governed: Governed,
    pub probes: &'static [Probe],
}

pub const PHPCS: &str = "./vendor/bin/phpcs -q --report=checkstyle | cs2pr";
pub const PSALM: &str = "./vendor/bin/psalm --shepherd --stats --output-format=github";
pub const PHPBENCH: &str = "./vendor/bin/phpbench run --revs=2 --iterations=2 --report=aggregate";
pub const YAMLLINT_MKDOCS: &str = "yamllint mkdocs.yml";
pub const MARKDOWNLINT_DOC: &str = "markdownlint doc/book/**/*.md";
pub const MARKDOWNLINT_DOCS: &str = "markdownlint docs/book/**/*.md";

pub const CHECK_TABLE: [CheckDefinition; 6] = [
    CheckDefinition {
        command: PHPCS,
        governed: Governed::Code,
        probes: &[Probe::File("phpcs.xml.dist"), Probe::File("phpcs.xml")],
    },
    CheckDefinition {
        command: PSALM,
        governed: Governed::Code,
        probes: &[Probe::File("psalm.xml.dist"), Probe::File("psalm.xml")],
    },
    CheckDefinition {
        command: PHPBENCH,
        governed: Governed::Code,
        probes: &[Probe::File("phpbench.json")],
    },
    CheckDefinition {
        command: YAMLLINT_MKDOCS,
        governed: Governed::Docs,
        probes: &[Probe::File("mkdocs.yml")],
    },
    CheckDefinition {
        command: MARKDOWNLINT_DOC,
        governed: Governed::Docs,
        probes: &[Probe::Dir("doc/book/")],
    },
    CheckDefinition {
        command: MARKDOWNLINT_DOCS,
        governed: Governed::Docs,
        probes: &[Probe::Dir("docs/book/")],
    },
];

const PHPUNIT_CONFIGS: [&str; 2] = ["phpunit.xml.dist", "phpunit.xml"];

/// Resolve the check commands for this run.
pub fn discover_checks(
    source: &CheckSource,
    requirements: &Requirements,
    paths: &ProjectPaths,
) -> Vec<String> {
    match source {
        CheckSource::Explicit(commands) => {
            tracing::info!("Using checks found in configuration");
            commands.clone()
        }
        CheckSource::Discover => {
            tracing::info!("Discovering checks based on QA files in package");
            discover_from_table(&CHECK_TABLE, requirements, paths)
        }
    }
}

fn discover_from_table(
    table: &[CheckDefinition],
    requirements: &Requirements,
    paths: &ProjectPaths,
) -> Vec<String> {
    let mut checks: Vec<String> = Vec::new();
    for definition in table {
        if !definition.governed.enabled(requirements) {
            tracing::debug!(command = definition.command, "check not required");
            continue;
        }
        for probe in definition.probes {
            if checks.iter().any(|command| command == definition.command) {
                break;
            }
            if probe.matches(paths) {
                tracing::debug!(command = definition.command, ?probe, "check discovered");
                checks.push(definition.command.to_string());
            }
        }
    }
    checks
}

/// True when `phpunit.xml.dist` or `phpunit.xml` exists.
pub fn has_phpunit_config(paths: &ProjectPaths) -> bool {
    PHPUNIT_CONFIGS.iter().any(|rel| paths.exists(rel))
}

#[cfg(test)]
#[path = "checks_tests.rs"]
mod tests;
