//! Matrix assembly: wires requirements, manifest, checks and jobs together.
use crate::checks::{discover_checks, has_phpunit_config};
use crate::config::load_config;
use crate::jobs::{check_jobs, fallback_job, unit_test_jobs, Job, JobSettings};
use crate::manifest::load_manifest;
use crate::project::ProjectPaths;
use crate::requirements::{read_diff, resolve_requirements, RequirementsMode};
use crate::versions::{dependency_sets, select_php_versions, DependencySet};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// Matrix descriptor handed to the CI platform.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Matrix {
    pub include: Vec<Job>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<Value>>,
}

impl Matrix {
    pub fn new(include: Vec<Job>, exclude: Option<Vec<Value>>) -> Self {
        Self { include, exclude }
    }

    /// Compact JSON, stable for identical inputs.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize matrix")
    }
}

/// Derive the matrix for the package rooted at `paths`.
pub fn build_matrix(mode: RequirementsMode, paths: &ProjectPaths) -> Result<Matrix> {
    tracing::debug!(root = %paths.root().display(), ?mode, "building matrix");
    let diff = match mode {
        RequirementsMode::Conditional => read_diff(&paths.diff_path())?,
        RequirementsMode::Unconditional => Vec::new(),
    };
    let requirements = resolve_requirements(mode, &diff);
    tracing::debug!(?requirements, "requirements resolved");

    let config = load_config(&paths.config_path())?;
    let manifest = load_manifest(paths)?;

    let settings = JobSettings {
        stable_php: config.stable_php().to_string(),
        extensions: config.extensions(),
        ini: config.php_ini(),
    };
    tracing::info!("Using stable PHP version: {}", settings.stable_php);
    tracing::info!("Providing php.ini settings: {:?}", settings.ini);
    tracing::info!("Using php extensions: {:?}", settings.extensions);

    let versions = select_php_versions(&manifest.php_constraint);
    tracing::info!(constraint = %manifest.php_constraint, "Versions found: {versions:?}");

    let dependencies = dependency_sets(manifest.locked);
    let dependency_names: Vec<&str> = dependencies.iter().map(DependencySet::as_str).collect();
    tracing::info!("Dependency sets found: {dependency_names:?}");

    let run_phpunit = if !requirements.code_checks {
        tracing::info!("No code checks required; skipping PHPUnit checks");
        false
    } else if has_phpunit_config(paths) {
        tracing::info!("Found phpunit configuration");
        true
    } else {
        tracing::info!("NO phpunit configuration found");
        false
    };

    let checks = discover_checks(&config.check_source(), &requirements, paths);
    tracing::info!("Checks found: {checks:?}");

    let mut jobs = Vec::new();
    if run_phpunit {
        jobs.extend(unit_test_jobs(&versions, &dependencies, &settings)?);
    }
    jobs.extend(check_jobs(&checks, &settings)?);
    if jobs.is_empty() {
        jobs.push(fallback_job(&settings.stable_php)?);
    }

    if config.exclude.is_some() {
        tracing::info!("Adding exclusions from configuration");
    }
    Ok(Matrix::new(jobs, config.exclude))
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
