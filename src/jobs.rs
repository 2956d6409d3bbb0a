//! Job emission.
//!
//! Every job carries its command descriptor as a JSON-encoded string, which is
//! what the container action expects as its single input.
use crate::versions::DependencySet;
use anyhow::{Context, Result};
use serde::Serialize;

pub const OPERATING_SYSTEM: &str = "ubuntu-latest";
pub const ACTION: &str = "laminas/laminas-continuous-integration-action@v0";
pub const PHPUNIT_COMMAND: &str = "./vendor/bin/phpunit";
pub const NO_CHECKS_NAME: &str = "No checks";
pub const NO_CHECKS_COMMAND: &str = "echo \"No checks discovered!\"";

/// Command descriptor consumed by the CI action.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobCommand<'a> {
    pub command: &'a str,
    pub php: &'a str,
    pub extensions: &'a [String],
    pub ini: &'a [String],
    pub dependencies: DependencySet,
}

/// One entry of the matrix `include` list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub name: String,
    pub job: String,
    pub operating_system: String,
    pub action: String,
}

impl Job {
    fn new(name: String, command: &JobCommand<'_>) -> Result<Self> {
        let job = serde_json::to_string(command)
            .with_context(|| format!("serialize job descriptor for {name}"))?;
        Ok(Self {
            name,
            job,
            operating_system: OPERATING_SYSTEM.to_string(),
            action: ACTION.to_string(),
        })
    }
}

/// Settings shared by every PHP job in the matrix.
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub stable_php: String,
    pub extensions: Vec<String>,
    pub ini: Vec<String>,
}

/// One PHPUnit job per PHP version and dependency set, version-major order.
pub fn unit_test_jobs(
    versions: &[&str],
    dependency_sets: &[DependencySet],
    settings: &JobSettings,
) -> Result<Vec<Job>> {
    let mut jobs = Vec::with_capacity(versions.len() * dependency_sets.len());
    for version in versions {
        for deps in dependency_sets {
            let command = JobCommand {
                command: PHPUNIT_COMMAND,
                php: version,
                extensions: &settings.extensions,
                ini: &settings.ini,
                dependencies: *deps,
            };
            let name = format!("PHPUnit on PHP {version} with {deps} dependencies");
            jobs.push(Job::new(name, &command)?);
        }
    }
    Ok(jobs)
}

/// One job per check command, on the stable PHP version with locked dependencies.
pub fn check_jobs(checks: &[String], settings: &JobSettings) -> Result<Vec<Job>> {
    checks
        .iter()
        .map(|check| {
            let command = JobCommand {
                command: check,
                php: &settings.stable_php,
                extensions: &settings.extensions,
                ini: &settings.ini,
                dependencies: DependencySet::Locked,
            };
            Job::new(format!("{check} on PHP {}", settings.stable_php), &command)
        })
        .collect()
}

/// Placeholder so the matrix is never empty.
pub fn fallback_job(stable_php: &str) -> Result<Job> {
    let command = JobCommand {
        command: NO_CHECKS_COMMAND,
        php: stable_php,
        extensions: &[],
        ini: &[],
        dependencies: DependencySet::Locked,
    };
    Job::new(NO_CHECKS_NAME.to_string(), &command)
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
