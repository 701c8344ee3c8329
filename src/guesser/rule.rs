//! Guesser rules and the registry of rule kinds

use regex::Regex;

use crate::error::{MetadataError, Result};

use super::pipeline::{Evidence, DIR_NAME, FILE_STEM};

/// Capture group holding the title
pub const TITLE_GROUP: &str = "title";

/// Pattern used by `filename_re` when no pattern is given: `1976 - Title`
pub const DEFAULT_FILENAME_PATTERN: &str = r"^(?P<year>[0-9]+) - (?P<title>[^\[.]+)";

/// Kinds of guesser rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuesserKind {
    /// Pattern over the file name without extension
    FilenamePattern,
    /// Pattern over the name of the directory holding the file
    DirnamePattern,
}

struct KindEntry {
    identifier: &'static str,
    kind: GuesserKind,
    build: fn(&str, Option<&str>) -> Result<GuesserRule>,
}

/// Registered rule kinds; a new kind needs a variant and an entry here.
const REGISTRY: &[KindEntry] = &[
    KindEntry {
        identifier: "filename_re",
        kind: GuesserKind::FilenamePattern,
        build: build_filename_rule,
    },
    KindEntry {
        identifier: "dirname_re",
        kind: GuesserKind::DirnamePattern,
        build: build_dirname_rule,
    },
];

impl GuesserKind {
    pub fn identifier(&self) -> &'static str {
        REGISTRY
            .iter()
            .find(|e| e.kind == *self)
            .map(|e| e.identifier)
            .unwrap_or("unknown")
    }

    /// Evidence value the rule reads
    pub fn evidence_key(&self) -> &'static str {
        match self {
            GuesserKind::FilenamePattern => FILE_STEM,
            GuesserKind::DirnamePattern => DIR_NAME,
        }
    }

    /// Identifiers accepted in rule specs
    pub fn identifiers() -> Vec<&'static str> {
        REGISTRY.iter().map(|e| e.identifier).collect()
    }
}

/// A registered title extraction rule
#[derive(Debug, Clone)]
pub struct GuesserRule {
    name: String,
    kind: GuesserKind,
    pattern: Regex,
    has_title_group: bool,
}

impl GuesserRule {
    /// Parse a `<kind>` or `<kind>:<argument>` spec
    pub fn from_spec(spec: &str) -> Result<Self> {
        let (identifier, argument) = match spec.split_once(':') {
            Some((identifier, argument)) => (identifier, Some(argument)),
            None => (spec, None),
        };
        if identifier.is_empty()
            || !identifier.chars().all(|c| c.is_ascii_lowercase() || c == '_')
        {
            return Err(spec_error(
                spec,
                "it is expected to be of the form <guesser_type>:<guesser_args>",
            ));
        }
        let entry = REGISTRY
            .iter()
            .find(|e| e.identifier == identifier)
            .ok_or_else(|| {
                spec_error(
                    spec,
                    format!(
                        "unexpected title guesser type {} (known types: {})",
                        identifier,
                        GuesserKind::identifiers().join(", ")
                    ),
                )
            })?;
        (entry.build)(spec, argument)
    }

    /// Build a pattern rule directly
    pub fn pattern(kind: GuesserKind, name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let anchored = Regex::new(&format!("^(?:{})", pattern))
            .map_err(|e| spec_error(&name, format!("invalid regular expression: {}", e)))?;
        let has_title_group = anchored.capture_names().flatten().any(|n| n == TITLE_GROUP);
        Ok(Self {
            name,
            kind,
            pattern: anchored,
            has_title_group,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GuesserKind {
        self.kind
    }

    /// Extract a candidate title, if the rule matches its evidence.
    ///
    /// The match is anchored at the start of the evidence value. The `title`
    /// group is the candidate when the pattern has one, the whole match
    /// otherwise. Blank candidates count as no match.
    pub fn extract(&self, evidence: &Evidence) -> Option<String> {
        let value = evidence.get(self.kind.evidence_key())?;
        let captures = self.pattern.captures(value)?;
        let matched = if self.has_title_group {
            captures.name(TITLE_GROUP)?
        } else {
            captures.get(0)?
        };
        let title = matched.as_str().trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }
}

fn build_filename_rule(spec: &str, argument: Option<&str>) -> Result<GuesserRule> {
    let pattern = match argument {
        Some(p) if !p.is_empty() => p,
        _ => DEFAULT_FILENAME_PATTERN,
    };
    GuesserRule::pattern(GuesserKind::FilenamePattern, spec, pattern)
}

fn build_dirname_rule(spec: &str, argument: Option<&str>) -> Result<GuesserRule> {
    match argument {
        Some(p) if !p.is_empty() => GuesserRule::pattern(GuesserKind::DirnamePattern, spec, p),
        _ => Err(spec_error(spec, "dirname_re requires a regular expression")),
    }
}

fn spec_error(spec: &str, reason: impl Into<String>) -> MetadataError {
    MetadataError::GuesserSpec {
        spec: spec.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn evidence(path: &str) -> Evidence {
        Evidence::from_path(Path::new(path))
    }

    #[test]
    fn test_filename_rule_extracts_title_group() {
        let rule = GuesserRule::from_spec(r"filename_re:^(?P<year>[0-9]+) - (?P<title>[^.]+)").unwrap();
        assert_eq!(rule.kind(), GuesserKind::FilenamePattern);
        assert_eq!(
            rule.extract(&evidence("/films/1976 - carroyage.avi")).as_deref(),
            Some("carroyage")
        );
        assert_eq!(rule.extract(&evidence("/films/carroyage.avi")), None);
    }

    #[test]
    fn test_bare_filename_rule_uses_default_pattern() {
        let rule = GuesserRule::from_spec("filename_re").unwrap();
        assert_eq!(
            rule.extract(&evidence("/films/1999 - The Matrix [1080p].mkv")).as_deref(),
            Some("The Matrix")
        );
    }

    #[test]
    fn test_whole_match_without_title_group() {
        let rule = GuesserRule::from_spec("filename_re:[A-Za-z ]+").unwrap();
        assert_eq!(
            rule.extract(&evidence("/films/Metropolis 1927.mp4")).as_deref(),
            Some("Metropolis")
        );
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        let rule = GuesserRule::from_spec("filename_re:(?P<title>[a-z]+)").unwrap();
        assert_eq!(rule.extract(&evidence("/films/1976 - carroyage.avi")), None);
    }

    #[test]
    fn test_blank_candidate_is_no_match() {
        let rule = GuesserRule::from_spec(r"filename_re:(?P<year>[0-9]+)(?P<title>\s*)").unwrap();
        assert_eq!(rule.extract(&evidence("/films/1976 .avi")), None);
    }

    #[test]
    fn test_dirname_rule() {
        let rule = GuesserRule::from_spec(r"dirname_re:(?P<title>.+) \([0-9]{4}\)").unwrap();
        assert_eq!(rule.kind().evidence_key(), DIR_NAME);
        assert_eq!(
            rule.extract(&evidence("/films/Alien (1979)/cd1.avi")).as_deref(),
            Some("Alien")
        );
        assert!(GuesserRule::from_spec("dirname_re").is_err());
    }

    #[test]
    fn test_bad_specs() {
        for spec in ["", "imdb:tt0078748", "Filename_re:x", "filename_re:(?P<title>[a-z"] {
            assert!(
                matches!(GuesserRule::from_spec(spec), Err(MetadataError::GuesserSpec { .. })),
                "spec {:?} should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(GuesserKind::identifiers(), vec!["filename_re", "dirname_re"]);
        assert_eq!(GuesserKind::DirnamePattern.identifier(), "dirname_re");
    }
}
