//! Configuration file support
//!
//! Loads the application configuration from TOML files. Every section is
//! optional; missing values fall back to [`AppConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{AppConfig, BackupMode, LogFormat, VerifyConfig};
use crate::error::{MetadataError, Result};

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Backup settings
    pub backup: Option<BackupSettings>,
    /// Verification settings
    pub verify: Option<VerifySettings>,
    /// Title guessing settings
    pub title: Option<TitleSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSettings {
    /// modify-original, modify-backup or no-backup
    pub mode: BackupMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySettings {
    /// Re-probe written files
    pub enabled: Option<bool>,
    /// Lowest accepted written/source size ratio
    pub min_size_ratio: Option<f64>,
    /// Highest accepted written/source size ratio
    pub max_size_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSettings {
    /// Default guesser specs (`<kind>[:<arg>]`)
    pub guessers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<LogFormat>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MetadataError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| MetadataError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MetadataError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = AppConfig::default();
        Self {
            backup: Some(BackupSettings {
                mode: defaults.backup_mode,
            }),
            verify: Some(VerifySettings {
                enabled: Some(defaults.verify.enabled),
                min_size_ratio: Some(defaults.verify.min_size_ratio),
                max_size_ratio: Some(defaults.verify.max_size_ratio),
            }),
            title: Some(TitleSettings {
                guessers: defaults.guessers,
            }),
            logging: Some(LoggingSettings {
                level: defaults.log_level,
                format: Some(defaults.log_format),
            }),
        }
    }

    /// Convert to AppConfig
    pub fn into_app_config(self) -> AppConfig {
        let defaults = AppConfig::default();
        let verify = match self.verify {
            Some(v) => VerifyConfig {
                enabled: v.enabled.unwrap_or(defaults.verify.enabled),
                min_size_ratio: v.min_size_ratio.unwrap_or(defaults.verify.min_size_ratio),
                max_size_ratio: v.max_size_ratio.unwrap_or(defaults.verify.max_size_ratio),
            },
            None => defaults.verify,
        };
        AppConfig {
            backup_mode: self
                .backup
                .map(|b| b.mode)
                .unwrap_or(defaults.backup_mode),
            verify,
            guessers: self
                .title
                .map(|t| t.guessers)
                .unwrap_or(defaults.guessers),
            log_level: self
                .logging
                .as_ref()
                .map(|l| l.level.clone())
                .unwrap_or(defaults.log_level),
            log_format: self
                .logging
                .and_then(|l| l.format)
                .unwrap_or(defaults.log_format),
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default_config();
        assert_eq!(config.backup.as_ref().unwrap().mode, BackupMode::ModifyOriginal);
        assert_eq!(config.verify.as_ref().unwrap().max_size_ratio, Some(1.02));
        assert_eq!(config.logging.as_ref().unwrap().level, "warn");
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = ConfigFile::default_config();

        let mut temp_file = NamedTempFile::new().unwrap();
        let content = toml::to_string_pretty(&config).unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let loaded = ConfigFile::from_file(temp_file.path()).unwrap();
        assert_eq!(
            loaded.title.unwrap().guessers,
            config.title.unwrap().guessers
        );
        assert_eq!(loaded.backup.unwrap().mode, BackupMode::ModifyOriginal);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            "[backup]\nmode = \"no-backup\"\n\n[verify]\nenabled = false\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n"
        )
        .unwrap();

        let config = ConfigFile::from_file(temp_file.path()).unwrap().into_app_config();
        assert_eq!(config.backup_mode, BackupMode::NoBackup);
        assert!(!config.verify.enabled);
        assert_eq!(config.verify.min_size_ratio, 0.99);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.guessers, AppConfig::default().guessers);
    }

    #[test]
    fn test_empty_file_is_default() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = ConfigFile::from_file(temp_file.path()).unwrap().into_app_config();
        assert_eq!(config.backup_mode, BackupMode::ModifyOriginal);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[backup]\nmode = \"sometimes\"\n").unwrap();
        assert!(matches!(
            ConfigFile::from_file(temp_file.path()),
            Err(MetadataError::Config(_))
        ));
    }

    #[test]
    fn test_generate_default_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        generate_default_config(&path).unwrap();

        assert!(path.exists());
        let loaded = ConfigFile::from_file(&path).unwrap().into_app_config();
        assert_eq!(loaded.verify.max_size_ratio, 1.02);
        assert!(loaded.guessers[0].starts_with("filename_re:"));
    }
}
