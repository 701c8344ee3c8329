//! Command implementations behind the CLI
//!
//! Every command works on a batch of files. Probe and write failures are
//! scoped to their file: they are reported, counted, and the batch moves on.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{MetadataError, Result};
use crate::index::MetadataProbe;
use crate::language::catalog::format_languages;
use crate::language::{LanguageCatalog, LanguageCode};
use crate::media::{MetadataDiff, VideoFile};
use crate::mux::MetadataWriter;
use crate::plan::Policy;
use crate::resolve::{InteractiveResolver, Prompter};

/// Outcome of a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Files probed successfully
    pub processed: usize,
    /// Files rewritten
    pub written: usize,
    /// File-scoped failures, in order
    pub failures: Vec<(PathBuf, String)>,
    /// Input ended mid-prompt
    pub aborted: bool,
}

impl BatchReport {
    fn fail(&mut self, path: &Path, error: &MetadataError) {
        tracing::error!("{}", error);
        self.failures.push((path.to_path_buf(), error.to_string()));
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }

    /// Process exit status for this batch
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

#[derive(Serialize)]
struct LanguageListing<'a> {
    path: &'a Path,
    container: String,
    languages: Vec<LanguageCode>,
    title: Option<&'a str>,
}

fn listing_line(file: &VideoFile, json: bool) -> Result<String> {
    if !json {
        return Ok(format!(
            "{} {}",
            file.path.display(),
            format_languages(&file.languages())
        ));
    }
    let listing = LanguageListing {
        path: &file.path,
        container: file.container.to_string(),
        languages: file.languages(),
        title: file.title.as_deref(),
    };
    serde_json::to_string(&listing).map_err(|e| MetadataError::Config(e.to_string()))
}

/// Print each file's path and audio track languages
pub fn show_audio_languages(
    paths: &[PathBuf],
    probe: &dyn MetadataProbe,
    json: bool,
    out: &mut dyn Write,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    for path in paths {
        match probe.probe(path) {
            Ok(file) => {
                report.processed += 1;
                writeln!(out, "{}", listing_line(&file, json)?)?;
            }
            Err(e) if e.is_file_scoped() => {
                writeln!(out, "failed to process {} : {}", path.display(), e)?;
                report.fail(path, &e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}

/// Interactively resolve and commit each file under `policy`
pub fn modify_metadata(
    paths: &[PathBuf],
    catalog: &LanguageCatalog,
    policy: &Policy,
    probe: &dyn MetadataProbe,
    prompter: &mut dyn Prompter,
    writer: &mut dyn MetadataWriter,
) -> Result<BatchReport> {
    let resolver = InteractiveResolver::new(catalog, policy);
    let mut report = BatchReport::default();

    for path in paths {
        prompter.say(&format!("{} :", path.display()))?;

        let file = match probe.probe(path) {
            Ok(file) => file,
            Err(e) if e.is_file_scoped() => {
                prompter.say(&format!("failed to process {} : {}", path.display(), e))?;
                report.fail(path, &e);
                continue;
            }
            Err(e) => return Err(e),
        };
        report.processed += 1;

        match resolver.resolve(&file, prompter, writer) {
            Ok(resolution) => {
                if resolution.written {
                    report.written += 1;
                }
            }
            Err(MetadataError::Aborted) => {
                tracing::warn!("Input ended while resolving {:?}; stopping", path);
                report.aborted = true;
                break;
            }
            Err(e) if e.is_file_scoped() => {
                prompter.say(&format!("failed to process {} : {}", path.display(), e))?;
                report.fail(path, &e);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Batch done: {} processed, {} written, {} failed",
        report.processed,
        report.written,
        report.failures.len()
    );
    Ok(report)
}

/// Set the whole audio language sequence of one file, without prompting
pub fn set_audio_languages(
    path: &Path,
    codes: &[String],
    catalog: &LanguageCatalog,
    probe: &dyn MetadataProbe,
    writer: &mut dyn MetadataWriter,
    out: &mut dyn Write,
) -> Result<BatchReport> {
    let languages = codes
        .iter()
        .map(|code| catalog.normalize(code))
        .collect::<Result<Vec<_>>>()?;

    let mut report = BatchReport::default();
    let file = match probe.probe(path) {
        Ok(file) => file,
        Err(e) if e.is_file_scoped() => {
            writeln!(out, "failed to process {} : {}", path.display(), e)?;
            report.fail(path, &e);
            return Ok(report);
        }
        Err(e) => return Err(e),
    };
    report.processed += 1;

    if file.languages() == languages {
        writeln!(
            out,
            "{} already has audio track languages {}",
            path.display(),
            format_languages(&languages)
        )?;
        return Ok(report);
    }

    let diff = MetadataDiff {
        title: None,
        languages: Some(languages),
    };
    writeln!(out, "{} : {}", path.display(), diff)?;
    match writer.write(&file, &diff) {
        Ok(()) => report.written += 1,
        Err(e) if e.is_file_scoped() => {
            writeln!(out, "failed to process {} : {}", path.display(), e)?;
            report.fail(path, &e);
        }
        Err(e) => return Err(e),
    }
    Ok(report)
}
