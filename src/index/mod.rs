//! Metadata probing module
//!
//! This module reads the current metadata of a video file:
//! - Container format (from the FFmpeg demuxer)
//! - Title (format-level `title` tag)
//! - Audio tracks and their languages (stream tags, AVI header tags)

use std::path::Path;

use crate::error::Result;
use crate::media::VideoFile;

pub mod audio;
pub mod scanner;

pub use scanner::{scan_file, FfmpegProbe};

/// Source of the current metadata of a file
pub trait MetadataProbe {
    /// Read the metadata of `path`. Fails with `MetadataError::Probe`.
    fn probe(&self, path: &Path) -> Result<VideoFile>;
}
