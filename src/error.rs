use std::path::PathBuf;

use thiserror::Error;

/// Main error type for videfix
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("unexpected language {value} : valid values are {}", format_code_list(.valid))]
    InvalidLanguage { value: String, valid: Vec<String> },

    #[error("failed to probe {}: {reason}", .path.display())]
    Probe { path: PathBuf, reason: String },

    #[error("failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },

    #[error("bad title guesser '{spec}': {reason}")]
    GuesserSpec { spec: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Aborted by user")]
    Aborted,

    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] FfmpegError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    pub fn probe(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        MetadataError::Probe {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        MetadataError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this failure only concerns the file being processed.
    pub fn is_file_scoped(&self) -> bool {
        matches!(self, MetadataError::Probe { .. } | MetadataError::Write { .. })
    }
}

/// FFmpeg-specific errors
#[derive(Error, Debug)]
pub enum FfmpegError {
    #[error("FFmpeg initialization failed: {0}")]
    InitFailed(String),

    #[error("Failed to open input file: {0}")]
    OpenInput(String),

    #[error("Failed to create output file: {0}")]
    OpenOutput(String),

    #[error("Stream configuration failed: {0}")]
    StreamConfig(String),

    #[error("Failed to write header: {0}")]
    WriteHeader(String),

    #[error("Failed to write packet: {0}")]
    WritePacket(String),

    #[error("Failed to write trailer: {0}")]
    WriteTrailer(String),
}

/// Renders codes the way the rejection message lists them: `['und', 'eng']`.
pub fn format_code_list(codes: &[String]) -> String {
    let quoted: Vec<String> = codes.iter().map(|c| format!("'{}'", c)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MetadataError>;
