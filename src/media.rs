//! Video file metadata model
//!
//! This module defines the values exchanged between the probe, the planner,
//! the resolver and the writer:
//! - `VideoFile`: what a probe found in a file
//! - `AudioTrack`: one audio stream and its language
//! - `MetadataDiff`: the approved changes for one file

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::language::LanguageCode;

/// Container format of a video file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ContainerFormat {
    Avi,
    Mp4,
    Matroska,
    Other(String),
}

impl ContainerFormat {
    /// Map an FFmpeg demuxer name (e.g. `mov,mp4,m4a,3gp,3g2,mj2`)
    pub fn from_demuxer_name(name: &str) -> Self {
        let has = |wanted: &[&str]| name.split(',').any(|n| wanted.contains(&n));
        if has(&["avi"]) {
            ContainerFormat::Avi
        } else if has(&["mp4", "mov"]) {
            ContainerFormat::Mp4
        } else if has(&["matroska", "webm"]) {
            ContainerFormat::Matroska
        } else {
            ContainerFormat::Other(name.split(',').next().unwrap_or(name).to_string())
        }
    }

    /// AVI keeps audio languages in RIFF header tags instead of the streams
    pub fn stores_languages_in_header(&self) -> bool {
        matches!(self, ContainerFormat::Avi)
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerFormat::Avi => f.write_str("avi"),
            ContainerFormat::Mp4 => f.write_str("mp4"),
            ContainerFormat::Matroska => f.write_str("matroska"),
            ContainerFormat::Other(name) => f.write_str(name),
        }
    }
}

/// Audio track information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTrack {
    /// Position among the file's audio streams (0-based)
    pub index: usize,
    /// Index of the stream in the container
    pub stream_index: usize,
    pub language: LanguageCode,
}

/// Metadata of one video file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoFile {
    pub path: PathBuf,
    pub container: ContainerFormat,
    pub audio_tracks: Vec<AudioTrack>,
    pub title: Option<String>,
}

impl VideoFile {
    pub fn new(path: impl Into<PathBuf>, container: ContainerFormat) -> Self {
        Self {
            path: path.into(),
            container,
            audio_tracks: Vec::new(),
            title: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Track languages in track order
    pub fn languages(&self) -> Vec<LanguageCode> {
        self.audio_tracks.iter().map(|t| t.language.clone()).collect()
    }

    /// Title as displayed and compared; a missing title is empty
    pub fn current_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// The metadata this file will carry once `diff` is written
    pub fn with_diff(&self, diff: &MetadataDiff) -> VideoFile {
        let mut updated = self.clone();
        if let Some(title) = &diff.title {
            updated.title = if title.is_empty() {
                None
            } else {
                Some(title.clone())
            };
        }
        if let Some(languages) = &diff.languages {
            for (track, language) in updated.audio_tracks.iter_mut().zip(languages) {
                track.language = language.clone();
            }
        }
        updated
    }
}

/// Approved metadata changes for one file.
///
/// Each field is either untouched (`None`) or fully specified: a language
/// change always carries the whole sequence, one code per track.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataDiff {
    pub title: Option<String>,
    pub languages: Option<Vec<LanguageCode>>,
}

impl MetadataDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.languages.is_none()
    }

    /// Check the diff can be applied to `file`
    pub fn fits(&self, file: &VideoFile) -> std::result::Result<(), String> {
        match &self.languages {
            Some(languages) if languages.len() != file.audio_tracks.len() => Err(format!(
                "unexpected number of languages in {} ({} languages are expected)",
                crate::language::catalog::format_languages(languages),
                file.audio_tracks.len()
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for MetadataDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(format!("title: {:?}", title));
        }
        if let Some(languages) = &self.languages {
            parts.push(format!(
                "languages: {}",
                crate::language::catalog::format_languages(languages)
            ));
        }
        write!(f, "{{{}}}", parts.join(", "))
    }
}
