//! Metadata writing module
//!
//! This module applies an approved [`MetadataDiff`] to a file:
//! - Tag edit planning per container (stream tags, AVI header tags)
//! - Timestamped backups
//! - FFmpeg stream-copy remux with the new tags
//! - Verification of the written file

use crate::error::Result;
use crate::media::{MetadataDiff, VideoFile};

pub mod backup;
pub mod remux;
pub mod tags;
pub mod writer;

pub use writer::FfmpegWriter;

/// Sink for approved metadata changes
pub trait MetadataWriter {
    /// Persist `diff` for `file`. Fails with `MetadataError::Write`.
    fn write(&mut self, file: &VideoFile, diff: &MetadataDiff) -> Result<()>;
}
