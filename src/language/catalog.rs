//! Immutable language table and code normalization

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{MetadataError, Result};

/// Code meaning "no language assigned"
pub const UNDEFINED: &str = "und";

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageDef {
    /// ISO 639-2/T code
    pub code: &'static str,
    /// Name written to AVI header tags
    pub name: &'static str,
    /// ISO 639-2/B code, when it differs from the terminology code
    pub bibliographic: Option<&'static str>,
}

pub const BUILTIN_LANGUAGES: &[LanguageDef] = &[
    LanguageDef { code: "und", name: "Unknown", bibliographic: None },
    LanguageDef { code: "eng", name: "English", bibliographic: None },
    LanguageDef { code: "fra", name: "Francais", bibliographic: Some("fre") },
    LanguageDef { code: "jpn", name: "Japanese", bibliographic: None },
    LanguageDef { code: "kor", name: "Korean", bibliographic: None },
    LanguageDef { code: "spa", name: "Espanol", bibliographic: None },
];

/// A language code known to be part of the catalog.
///
/// Only [`LanguageCatalog`] hands these out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LanguageCode(&'static str);

impl LanguageCode {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_undefined(&self) -> bool {
        self.0 == UNDEFINED
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Shared, read-only language table.
///
/// Cloning is cheap; every clone points at the same table.
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    defs: Arc<[LanguageDef]>,
}

impl LanguageCatalog {
    /// Build a catalog from an explicit table. The table must contain `und`.
    pub fn new(defs: &[LanguageDef]) -> Result<Self> {
        if !defs.iter().any(|d| d.code == UNDEFINED) {
            return Err(MetadataError::Config(format!(
                "language catalog must contain '{}'",
                UNDEFINED
            )));
        }
        Ok(Self { defs: Arc::from(defs) })
    }

    /// Catalog with the languages videfix ships with
    pub fn builtin() -> Self {
        Self {
            defs: Arc::from(BUILTIN_LANGUAGES),
        }
    }

    pub fn is_valid(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    /// Validate user input against the catalog.
    ///
    /// Surrounding whitespace and case are ignored; anything else must match a
    /// catalog code exactly.
    pub fn normalize(&self, raw: &str) -> Result<LanguageCode> {
        self.lookup(raw).ok_or_else(|| MetadataError::InvalidLanguage {
            value: raw.trim().to_string(),
            valid: self.codes().iter().map(|c| c.to_string()).collect(),
        })
    }

    /// The `und` code
    pub fn undefined(&self) -> LanguageCode {
        LanguageCode(UNDEFINED)
    }

    /// All catalog codes, in catalog order
    pub fn codes(&self) -> Vec<&'static str> {
        self.defs.iter().map(|d| d.code).collect()
    }

    /// Resolve a `language` tag read from a container.
    ///
    /// Unlike [`normalize`](Self::normalize) this accepts bibliographic codes,
    /// which muxers still write for some languages. An empty tag is `und`.
    pub fn from_container_tag(&self, tag: &str) -> Option<LanguageCode> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Some(self.undefined());
        }
        self.lookup(tag).or_else(|| {
            self.defs
                .iter()
                .find(|d| {
                    d.bibliographic
                        .map(|b| b.eq_ignore_ascii_case(tag))
                        .unwrap_or(false)
                })
                .map(|d| LanguageCode(d.code))
        })
    }

    /// Resolve a display name (AVI `IAS<n>` tag value)
    pub fn from_display_name(&self, name: &str) -> Option<LanguageCode> {
        let name = name.trim();
        self.defs
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .map(|d| LanguageCode(d.code))
    }

    pub fn display_name(&self, code: &LanguageCode) -> &'static str {
        self.defs
            .iter()
            .find(|d| d.code == code.0)
            .map(|d| d.name)
            .unwrap_or(code.0)
    }

    fn lookup(&self, raw: &str) -> Option<LanguageCode> {
        let raw = raw.trim();
        self.defs
            .iter()
            .find(|d| d.code.eq_ignore_ascii_case(raw))
            .map(|d| LanguageCode(d.code))
    }
}

impl Default for LanguageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `[fra, eng]`, the way track languages are displayed
pub fn format_languages(languages: &[LanguageCode]) -> String {
    let codes: Vec<&str> = languages.iter().map(|l| l.as_str()).collect();
    format!("[{}]", codes.join(", "))
}
