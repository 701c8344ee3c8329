//! Language code catalog
//!
//! This module owns the set of audio languages videfix knows about:
//! - ISO 639-2/T codes (the only form accepted from the user)
//! - Display names, as stored in AVI `IAS<n>` header tags
//! - Bibliographic aliases, only honoured when reading tags from files

pub mod catalog;

pub use catalog::{LanguageCatalog, LanguageCode, LanguageDef, BUILTIN_LANGUAGES, UNDEFINED};
