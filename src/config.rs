//! Runtime configuration

use serde::{Deserialize, Serialize};

use crate::guesser::rule::DEFAULT_FILENAME_PATTERN;

/// Where the rewritten file ends up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackupMode {
    /// Keep a timestamped copy and rewrite the original path
    #[default]
    ModifyOriginal,
    /// Leave the original untouched and write the result to the backup path
    ModifyBackup,
    /// Rewrite the original and delete the copy once verified
    NoBackup,
}

/// Post-write verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Re-probe the written file and compare sizes
    pub enabled: bool,

    /// Lowest accepted written/source size ratio
    pub min_size_ratio: f64,

    /// Highest accepted written/source size ratio
    pub max_size_ratio: f64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_size_ratio: 0.99,
            max_size_ratio: 1.02,
        }
    }
}

impl VerifyConfig {
    /// Check the written file size against the source size
    pub fn check_size_ratio(&self, source_len: u64, written_len: u64) -> Result<(), String> {
        if source_len == 0 {
            return Err("source file is empty".to_string());
        }
        let ratio = written_len as f64 / source_len as f64;
        if ratio < self.min_size_ratio || ratio > self.max_size_ratio {
            return Err(format!(
                "written file size {} is {:.3} times the source size {} (expected {} to {})",
                written_len, ratio, source_len, self.min_size_ratio, self.max_size_ratio
            ));
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backup behaviour of the writer
    pub backup_mode: BackupMode,

    /// Verification of written files
    pub verify: VerifyConfig,

    /// Title guesser specs used when none are given on the command line
    pub guessers: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backup_mode: BackupMode::default(),
            verify: VerifyConfig::default(),
            guessers: vec![format!("filename_re:{}", DEFAULT_FILENAME_PATTERN)],
            log_level: "warn".to_string(),
            log_format: LogFormat::default(),
        }
    }
}
