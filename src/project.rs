//! Typed paths into a PHP package checkout.
//!
//! Every probe the matrix builder makes goes through `ProjectPaths`, so the
//! whole derivation can be pointed at a temp directory in tests.
use std::path::{Path, PathBuf};

pub const DIFF_REL: &str = ".laminas-ci-diff";
pub const CONFIG_REL: &str = ".laminas-ci.json";
pub const MANIFEST_REL: &str = "composer.json";
pub const LOCKFILE_REL: &str = "composer.lock";

/// Convenience wrapper for locating package files.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Create a new path helper rooted at the package root.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the package root used for path derivation.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `.laminas-ci-diff` path.
    pub fn diff_path(&self) -> PathBuf {
        self.root.join(DIFF_REL)
    }

    /// Return the `.laminas-ci.json` path.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_REL)
    }

    /// Return the `composer.json` path.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_REL)
    }

    /// Return the `composer.lock` path.
    pub fn lockfile_path(&self) -> PathBuf {
        self.root.join(LOCKFILE_REL)
    }

    pub fn has_lockfile(&self) -> bool {
        self.lockfile_path().exists()
    }

    /// True when `rel` names an existing file or directory.
    pub fn exists(&self, rel: &str) -> bool {
        self.root.join(rel).exists()
    }

    /// True only when `rel` names an existing directory.
    pub fn is_dir(&self, rel: &str) -> bool {
        self.root.join(rel).is_dir()
    }
}
