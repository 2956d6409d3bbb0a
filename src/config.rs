//! Package-owned CI configuration (`.laminas-ci.json`).
//!
//! The file is optional. When present it must be valid JSON; a syntax error
//! stops the run. Known keys holding a value of the wrong type are ignored
//! and fall back to their defaults.
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const DEFAULT_STABLE_PHP: &str = "7.4";
pub const BASE_PHP_INI: &str = "memory_limit=-1";

/// User-supplied overrides for matrix generation.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub stable_php: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub ini: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub extensions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub checks: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub exclude: Option<Vec<Value>>,
}

/// Strings as given, numbers rendered as written; anything else is ignored.
fn lenient_scalar<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Null => None,
        other => {
            tracing::warn!("ignoring non-scalar configuration value {other}");
            None
        }
    })
}

/// Arrays only; a value of any other type is ignored.
fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items),
        Value::Null => None,
        other => {
            tracing::warn!("ignoring non-array configuration value {other}");
            None
        }
    })
}

/// Arrays of strings; non-string entries are dropped.
fn lenient_string_list<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_list(deserializer)?.map(|items| {
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                other => {
                    tracing::warn!("ignoring non-string configuration entry {other}");
                    None
                }
            })
            .collect()
    }))
}

/// Where check commands come from, decided once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckSource {
    /// Commands listed in the configuration, used verbatim.
    Explicit(Vec<String>),
    /// Probe the package for QA configuration files.
    Discover,
}

impl Configuration {
    pub fn stable_php(&self) -> &str {
        self.stable_php.as_deref().unwrap_or(DEFAULT_STABLE_PHP)
    }

    /// php.ini settings for every job; `memory_limit=-1` always comes first.
    pub fn php_ini(&self) -> Vec<String> {
        let mut ini = vec![BASE_PHP_INI.to_string()];
        if let Some(extra) = &self.ini {
            ini.extend(extra.iter().cloned());
        }
        ini
    }

    pub fn extensions(&self) -> Vec<String> {
        self.extensions.clone().unwrap_or_default()
    }

    pub fn check_source(&self) -> CheckSource {
        match &self.checks {
            Some(checks) if !checks.is_empty() => CheckSource::Explicit(checks.clone()),
            _ => CheckSource::Discover,
        }
    }
}

/// Load `.laminas-ci.json`; an absent file yields the default configuration.
pub fn load_config(path: &Path) -> Result<Configuration> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no CI configuration present");
        return Ok(Configuration::default());
    }
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&bytes).with_context(|| format!("parse {}", path.display()))
}

fn parse_config(bytes: &[u8]) -> Result<Configuration> {
    let value: Value = serde_json::from_slice(bytes).context("invalid CI config JSON")?;
    if !value.is_object() {
        tracing::warn!("CI configuration is not a JSON object; using defaults");
        return Ok(Configuration::default());
    }
    let config: Configuration =
        serde_json::from_value(value).context("invalid CI config structure")?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
