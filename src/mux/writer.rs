//! FFmpeg-backed metadata writer

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::{BackupMode, VerifyConfig};
use crate::error::{MetadataError, Result};
use crate::index::{FfmpegProbe, MetadataProbe};
use crate::language::catalog::format_languages;
use crate::language::LanguageCatalog;
use crate::media::{MetadataDiff, VideoFile};

use super::backup::create_backup;
use super::remux::remux_with_tags;
use super::tags::plan_tag_edits;
use super::MetadataWriter;

/// Rewrites files through a stream-copy remux.
///
/// A timestamped backup is always taken first. With the default mode the
/// backup is the remux source and the original path receives the result.
pub struct FfmpegWriter<P = FfmpegProbe> {
    catalog: LanguageCatalog,
    probe: P,
    backup_mode: BackupMode,
    verify: VerifyConfig,
}

impl FfmpegWriter<FfmpegProbe> {
    pub fn new(catalog: LanguageCatalog, backup_mode: BackupMode, verify: VerifyConfig) -> Self {
        let probe = FfmpegProbe::new(catalog.clone());
        Self::with_probe(catalog, probe, backup_mode, verify)
    }
}

impl<P: MetadataProbe> FfmpegWriter<P> {
    /// Writer verifying its output with `probe`
    pub fn with_probe(
        catalog: LanguageCatalog,
        probe: P,
        backup_mode: BackupMode,
        verify: VerifyConfig,
    ) -> Self {
        Self {
            catalog,
            probe,
            backup_mode,
            verify,
        }
    }

    /// Re-probe `written` and compare it with what the diff promised
    fn verify_written(&self, expected: &VideoFile, source: &Path, written: &Path) -> std::result::Result<(), String> {
        let actual = self.probe.probe(written).map_err(|e| e.to_string())?;
        check_written(expected, &actual)?;

        let source_len = fs::metadata(source).map_err(|e| e.to_string())?.len();
        let written_len = fs::metadata(written).map_err(|e| e.to_string())?.len();
        self.verify.check_size_ratio(source_len, written_len)
    }

    /// Put the backup back in place after a failed rewrite of the original
    fn restore(&self, original: &Path, backup: &Path) {
        match fs::rename(backup, original) {
            Ok(()) => tracing::warn!("Restored {:?} from {:?}", original, backup),
            Err(e) => tracing::error!(
                "Could not restore {:?} from {:?}: {}",
                original,
                backup,
                e
            ),
        }
    }
}

impl<P: MetadataProbe> MetadataWriter for FfmpegWriter<P> {
    fn write(&mut self, file: &VideoFile, diff: &MetadataDiff) -> Result<()> {
        if diff.is_empty() {
            return Ok(());
        }
        diff.fits(file)
            .map_err(|reason| MetadataError::write(file.path(), reason))?;

        let edits = plan_tag_edits(file, diff, &self.catalog);
        let original = file.path().to_path_buf();
        let backup = create_backup(&original, &Local::now().naive_local()).map_err(|e| {
            MetadataError::write(&original, format!("cannot create backup: {}", e))
        })?;

        let (src, dst): (PathBuf, PathBuf) = match self.backup_mode {
            BackupMode::ModifyBackup => (original.clone(), backup.clone()),
            BackupMode::ModifyOriginal | BackupMode::NoBackup => (backup.clone(), original.clone()),
        };
        tracing::debug!("Rewriting {:?} from {:?} with {:?}", dst, src, edits);

        let outcome = remux_with_tags(&src, &dst, &edits)
            .map_err(|e| e.to_string())
            .and_then(|()| {
                if self.verify.enabled {
                    self.verify_written(&file.with_diff(diff), &src, &dst)
                } else {
                    Ok(())
                }
            });

        if let Err(reason) = outcome {
            if self.backup_mode == BackupMode::ModifyBackup {
                return Err(MetadataError::write(&original, discard_output(&backup, reason)));
            }
            self.restore(&original, &backup);
            return Err(MetadataError::write(&original, reason));
        }

        if self.backup_mode == BackupMode::NoBackup {
            fs::remove_file(&backup)
                .map_err(|e| MetadataError::write(&original, format!("cannot remove backup: {}", e)))?;
        } else {
            tracing::info!("Backup kept at {:?}", backup);
        }
        tracing::info!("Wrote {} to {:?}", diff, dst);
        Ok(())
    }
}

/// Remove an output that failed to write or verify, and say so in `reason`
fn discard_output(output: &Path, reason: String) -> String {
    match fs::remove_file(output) {
        Ok(()) => format!("{} (incomplete output {} removed)", reason, output.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => reason,
        Err(e) => {
            tracing::error!("Could not remove {:?}: {}", output, e);
            format!(
                "{} (incomplete output left at {}: {})",
                reason,
                output.display(),
                e
            )
        }
    }
}

/// Compare a re-probed file with the expected result
pub fn check_written(expected: &VideoFile, actual: &VideoFile) -> std::result::Result<(), String> {
    if actual.languages() != expected.languages() {
        return Err(format!(
            "audio languages are {} after writing, expected {}",
            format_languages(&actual.languages()),
            format_languages(&expected.languages())
        ));
    }
    if actual.current_title() != expected.current_title() {
        return Err(format!(
            "title is '{}' after writing, expected '{}'",
            actual.current_title(),
            expected.current_title()
        ));
    }
    Ok(())
}
