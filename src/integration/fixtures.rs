//! Test fixtures for integration tests
//!
//! Provides in-memory video files, a probe and a recording writer, so the
//! resolution flow can be tested without actual media files.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{MetadataError, Result};
use crate::index::MetadataProbe;
use crate::language::LanguageCatalog;
use crate::media::{AudioTrack, ContainerFormat, MetadataDiff, VideoFile};
use crate::mux::MetadataWriter;

/// Build a file with one audio track per code. Stream 0 is the video
/// stream, so audio streams start at 1.
pub fn video_file(
    path: impl Into<PathBuf>,
    container: ContainerFormat,
    languages: &[&str],
    title: Option<&str>,
) -> VideoFile {
    let catalog = LanguageCatalog::builtin();
    let mut file = VideoFile::new(path, container);
    file.title = title.map(|t| t.to_string());
    file.audio_tracks = languages
        .iter()
        .enumerate()
        .map(|(index, code)| AudioTrack {
            index,
            stream_index: index + 1,
            language: catalog
                .normalize(code)
                .expect("fixture languages come from the catalog"),
        })
        .collect();
    file
}

/// In-memory media library: probes return the stored files, writes update
/// them and are recorded.
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    files: RefCell<BTreeMap<PathBuf, VideoFile>>,
    writes: RefCell<Vec<(PathBuf, MetadataDiff)>>,
    failing: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryLibrary {
    pub fn with_files(files: Vec<VideoFile>) -> Self {
        let library = Self::default();
        for file in files {
            library.files.borrow_mut().insert(file.path.clone(), file);
        }
        library
    }

    /// Every write received so far, in order
    pub fn writes(&self) -> Vec<(PathBuf, MetadataDiff)> {
        self.writes.borrow().clone()
    }

    /// Make every write to `path` fail
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.failing.borrow_mut().insert(path.into());
    }

    /// Current state of a stored file
    pub fn file(&self, path: impl AsRef<Path>) -> Option<VideoFile> {
        self.files.borrow().get(path.as_ref()).cloned()
    }
}

impl MetadataProbe for MemoryLibrary {
    fn probe(&self, path: &Path) -> Result<VideoFile> {
        self.file(path)
            .ok_or_else(|| MetadataError::probe(path, "No such file or directory"))
    }
}

impl MetadataWriter for &MemoryLibrary {
    fn write(&mut self, file: &VideoFile, diff: &MetadataDiff) -> Result<()> {
        if self.failing.borrow().contains(file.path()) {
            return Err(MetadataError::write(file.path(), "Permission denied"));
        }
        diff.fits(file)
            .map_err(|reason| MetadataError::write(file.path(), reason))?;
        self.files
            .borrow_mut()
            .insert(file.path.clone(), file.with_diff(diff));
        self.writes
            .borrow_mut()
            .push((file.path.clone(), diff.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_applies_writes() {
        let file = video_file("/films/a.mkv", ContainerFormat::Matroska, &["und"], None);
        let library = MemoryLibrary::with_files(vec![file.clone()]);
        let catalog = LanguageCatalog::builtin();
        let diff = MetadataDiff {
            title: Some("A".to_string()),
            languages: Some(vec![catalog.normalize("eng").unwrap()]),
        };

        let mut writer = &library;
        writer.write(&file, &diff).unwrap();

        let stored = library.probe(Path::new("/films/a.mkv")).unwrap();
        assert_eq!(stored.current_title(), "A");
        assert_eq!(stored.languages(), vec![catalog.normalize("eng").unwrap()]);
        assert_eq!(library.writes().len(), 1);
        assert!(library.probe(Path::new("/films/missing.mkv")).is_err());
    }
}
