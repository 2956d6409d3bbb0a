//! Composer version constraints (`require.php` in `composer.json`).
//!
//! A constraint is a disjunction (`||`) of conjunctions (`,` or whitespace)
//! of comparators. Caret, tilde, wildcard and hyphen forms are expanded into
//! plain lower/upper bounds at parse time, so matching is a simple scan.
//!
//! Matching follows Composer rules rather than npm semver on purpose:
//! `~7.1` allows every 7.x from 7.1 on, and `,` joins comparators.
use anyhow::{anyhow, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// A three-component release version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        Ok(PartialVersion::parse(raw)?.floor())
    }
}

/// Version as written in a constraint, keeping how many parts were given.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PartialVersion {
    parts: Vec<u64>,
}

impl PartialVersion {
    fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let without_prefix = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        // pre-release and build metadata do not move bounds
        let release = without_prefix
            .split(['-', '+'])
            .next()
            .unwrap_or_default();
        let parts = release
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| anyhow!("invalid version {raw:?}"))?;
        if parts.is_empty() || parts.len() > 4 {
            return Err(anyhow!("invalid version {raw:?}"));
        }
        Ok(Self {
            parts: parts.into_iter().take(3).collect(),
        })
    }

    fn part(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }

    /// Missing components padded with zeros.
    fn floor(&self) -> Version {
        Version::new(self.part(0), self.part(1), self.part(2))
    }

    /// Increment the component at `index` and zero everything after it.
    fn bump(&self, index: usize) -> Version {
        match index {
            0 => Version::new(self.part(0) + 1, 0, 0),
            1 => Version::new(self.part(0), self.part(1) + 1, 0),
            _ => Version::new(self.part(0), self.part(1), self.part(2) + 1),
        }
    }

    fn last_index(&self) -> usize {
        self.parts.len() - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            Op::Eq => candidate == &self.version,
            Op::Ne => candidate != &self.version,
            Op::Lt => candidate < &self.version,
            Op::Le => candidate <= &self.version,
            Op::Gt => candidate > &self.version,
            Op::Ge => candidate >= &self.version,
        }
    }
}

/// Parsed Composer constraint expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    raw: String,
    any_of: Vec<Vec<Comparator>>,
}

impl Constraint {
    /// True when `version` satisfies at least one alternative.
    pub fn matches(&self, version: &Version) -> bool {
        self.any_of
            .iter()
            .any(|all_of| all_of.iter().all(|comparator| comparator.matches(version)))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Constraint {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("empty version constraint"));
        }
        let or_split = Regex::new(r"\s*\|\|?\s*").expect("regex for constraint alternatives");
        let any_of = or_split
            .split(trimmed)
            .map(parse_alternative)
            .collect::<Result<Vec<_>>>()
            .map_err(|err| anyhow!("invalid version constraint {raw:?}: {err}"))?;
        Ok(Self {
            raw: trimmed.to_string(),
            any_of,
        })
    }
}

fn parse_alternative(alternative: &str) -> Result<Vec<Comparator>> {
    if alternative.is_empty() {
        return Err(anyhow!("empty alternative"));
    }
    let hyphen = Regex::new(r"^(\S+)\s+-\s+(\S+)$").expect("regex for hyphen ranges");
    if let Some(caps) = hyphen.captures(alternative) {
        return parse_hyphen_range(&caps[1], &caps[2]);
    }

    // `>= 7.1` is a single term; glue operators to their version first
    let glued = Regex::new(r"([<>=!~^]+)\s+")
        .expect("regex for spaced operators")
        .replace_all(alternative, "$1");
    let mut comparators = Vec::new();
    for term in glued
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|term| !term.is_empty())
    {
        comparators.extend(parse_term(term)?);
    }
    Ok(comparators)
}

fn parse_hyphen_range(lower: &str, upper: &str) -> Result<Vec<Comparator>> {
    let lower = PartialVersion::parse(lower)?;
    let upper = PartialVersion::parse(upper)?;
    let upper_bound = if upper.parts.len() < 3 {
        Comparator::new(Op::Lt, upper.bump(upper.last_index()))
    } else {
        Comparator::new(Op::Le, upper.floor())
    };
    Ok(vec![Comparator::new(Op::Ge, lower.floor()), upper_bound])
}

fn parse_term(term: &str) -> Result<Vec<Comparator>> {
    // stability flags (`@dev`, `@stable`) do not affect release matching
    let term = term.split('@').next().unwrap_or_default();
    if term.is_empty() || matches!(term, "*" | "x" | "X") {
        return Ok(Vec::new());
    }

    const OPERATORS: [(&str, Op); 8] = [
        (">=", Op::Ge),
        ("<=", Op::Le),
        ("<>", Op::Ne),
        ("!=", Op::Ne),
        ("==", Op::Eq),
        (">", Op::Gt),
        ("<", Op::Lt),
        ("=", Op::Eq),
    ];
    for (prefix, op) in OPERATORS {
        if let Some(rest) = term.strip_prefix(prefix) {
            let version = PartialVersion::parse(rest)?;
            return Ok(vec![Comparator::new(op, version.floor())]);
        }
    }

    if let Some(rest) = term.strip_prefix('^') {
        let version = PartialVersion::parse(rest)?;
        let significant = version
            .parts
            .iter()
            .position(|part| *part != 0)
            .unwrap_or_else(|| version.last_index());
        return Ok(vec![
            Comparator::new(Op::Ge, version.floor()),
            Comparator::new(Op::Lt, version.bump(significant)),
        ]);
    }

    if let Some(rest) = term.strip_prefix('~') {
        let version = PartialVersion::parse(rest)?;
        let index = version.parts.len().saturating_sub(2);
        return Ok(vec![
            Comparator::new(Op::Ge, version.floor()),
            Comparator::new(Op::Lt, version.bump(index)),
        ]);
    }

    if let Some(prefix) = wildcard_prefix(term) {
        let version = PartialVersion::parse(prefix)?;
        return Ok(vec![
            Comparator::new(Op::Ge, version.floor()),
            Comparator::new(Op::Lt, version.bump(version.last_index())),
        ]);
    }

    let version = PartialVersion::parse(term)?;
    Ok(vec![Comparator::new(Op::Eq, version.floor())])
}

fn wildcard_prefix(term: &str) -> Option<&str> {
    [".*", ".x", ".X"]
        .iter()
        .find_map(|suffix| term.strip_suffix(suffix))
}

#[cfg(test)]
#[path = "constraint_tests.rs"]
mod tests;
