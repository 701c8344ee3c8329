//! Ordered guesser pipeline

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

use super::rule::GuesserRule;

/// Evidence key: file name without extension
pub const FILE_STEM: &str = "file_stem";
/// Evidence key: name of the directory holding the file
pub const DIR_NAME: &str = "parent_dir";

/// Named context values a guesser can look at
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    values: BTreeMap<String, String>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evidence derived from a file path
    pub fn from_path(path: &Path) -> Self {
        let mut evidence = Self::new();
        if let Some(stem) = path.file_stem() {
            evidence.insert(FILE_STEM, stem.to_string_lossy());
        }
        if let Some(dir) = path.parent().and_then(|p| p.file_name()) {
            evidence.insert(DIR_NAME, dir.to_string_lossy());
        }
        evidence
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }
}

/// A proposed title and the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCandidate {
    pub title: String,
    pub rule: String,
}

/// Guesser rules in registration order
#[derive(Debug, Clone, Default)]
pub struct TitleGuesserPipeline {
    rules: Vec<GuesserRule>,
}

impl TitleGuesserPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipeline from rule specs, keeping their order
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let mut pipeline = Self::new();
        for spec in specs {
            pipeline.register(GuesserRule::from_spec(spec.as_ref())?);
        }
        Ok(pipeline)
    }

    pub fn register(&mut self, rule: GuesserRule) {
        tracing::debug!("Registered title guesser {}", rule.name());
        self.rules.push(rule);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// First non-empty candidate, trying rules in registration order
    pub fn propose(&self, evidence: &Evidence) -> Option<TitleCandidate> {
        self.rules.iter().find_map(|rule| {
            rule.extract(evidence).map(|title| TitleCandidate {
                title,
                rule: rule.name().to_string(),
            })
        })
    }
}
