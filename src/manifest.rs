//! Package manifest (`composer.json`) and lockfile state.
use crate::constraint::Constraint;
use crate::project::ProjectPaths;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

#[derive(Deserialize)]
struct ComposerJson {
    #[serde(default)]
    require: Option<BTreeMap<String, String>>,
}

/// What the matrix needs to know about the package.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub php_constraint: Constraint,
    pub locked: bool,
}

/// Load `composer.json` (required) and note whether `composer.lock` exists.
pub fn load_manifest(paths: &ProjectPaths) -> Result<Manifest> {
    let path = paths.manifest_path();
    let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    let php_constraint =
        parse_php_constraint(&bytes).with_context(|| format!("parse {}", path.display()))?;
    Ok(Manifest {
        php_constraint,
        locked: paths.has_lockfile(),
    })
}

fn parse_php_constraint(bytes: &[u8]) -> Result<Constraint> {
    let composer: ComposerJson =
        serde_json::from_slice(bytes).context("invalid composer JSON")?;
    let raw = composer
        .require
        .as_ref()
        .and_then(|require| require.get("php"))
        .ok_or_else(|| anyhow!("missing require.php constraint"))?;
    raw.parse()
}
