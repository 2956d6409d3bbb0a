//! PHP version and dependency-set selection for unit-test jobs.
use crate::constraint::{Constraint, Version};
use serde::Serialize;
use std::fmt;

/// PHP minor releases the CI action can provision, oldest first.
pub const PHP_VERSIONS: [&str; 7] = ["5.6", "7.0", "7.1", "7.2", "7.3", "7.4", "8.0"];

/// How Composer resolves dependencies for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencySet {
    Lowest,
    Latest,
    Locked,
}

impl DependencySet {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencySet::Lowest => "lowest",
            DependencySet::Latest => "latest",
            DependencySet::Locked => "locked",
        }
    }
}

impl fmt::Display for DependencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidates from `PHP_VERSIONS` whose `.0` release satisfies `constraint`.
pub fn select_php_versions(constraint: &Constraint) -> Vec<&'static str> {
    PHP_VERSIONS
        .iter()
        .copied()
        .filter(|candidate| {
            format!("{candidate}.0")
                .parse::<Version>()
                .is_ok_and(|version| constraint.matches(&version))
        })
        .collect()
}

/// `lowest` and `latest` always; `locked` only with a lockfile.
pub fn dependency_sets(locked: bool) -> Vec<DependencySet> {
    let mut sets = vec![DependencySet::Lowest, DependencySet::Latest];
    if locked {
        sets.push(DependencySet::Locked);
    }
    sets
}
