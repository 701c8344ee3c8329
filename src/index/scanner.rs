//! File scanner - reads container metadata with FFmpeg

use std::path::Path;

use ffmpeg_next as ffmpeg;

use crate::error::{FfmpegError, MetadataError, Result};
use crate::language::LanguageCatalog;
use crate::media::{AudioTrack, ContainerFormat, VideoFile};

use super::audio::{get_stream_language, header_language_tags, merge_track_languages};
use super::MetadataProbe;

/// Probe backed by the FFmpeg demuxers
#[derive(Debug, Clone)]
pub struct FfmpegProbe {
    catalog: LanguageCatalog,
}

impl FfmpegProbe {
    pub fn new(catalog: LanguageCatalog) -> Self {
        Self { catalog }
    }
}

impl MetadataProbe for FfmpegProbe {
    fn probe(&self, path: &Path) -> Result<VideoFile> {
        scan_file(path, &self.catalog)
    }
}

/// Scan a media file and extract its title and audio track languages
pub fn scan_file<P: AsRef<Path>>(path: P, catalog: &LanguageCatalog) -> Result<VideoFile> {
    let path = path.as_ref();

    crate::ffmpeg::init()?;

    let context = ffmpeg::format::input(path).map_err(|e| {
        MetadataError::probe(path, FfmpegError::OpenInput(format!("{}", e)))
    })?;

    let container = ContainerFormat::from_demuxer_name(context.format().name());
    let header = context.metadata();
    let title = header.get("title").map(|s| s.to_string());
    let header_tags = if container.stores_languages_in_header() {
        header_language_tags(header.iter())
    } else {
        Default::default()
    };

    let mut stream_indices = Vec::new();
    let mut stream_tags = Vec::new();
    for stream in context.streams() {
        let medium = stream.parameters().medium();
        if medium == ffmpeg::media::Type::Audio {
            let language = get_stream_language(&stream);
            tracing::debug!(
                "Found audio stream {}: language={:?}",
                stream.index(),
                language
            );
            stream_indices.push(stream.index());
            stream_tags.push(language);
        } else {
            tracing::debug!("Skipping stream {} (type={:?})", stream.index(), medium);
        }
    }

    let languages = merge_track_languages(catalog, &stream_tags, &header_tags)
        .map_err(|reason| MetadataError::probe(path, reason))?;

    let mut file = VideoFile::new(path, container);
    file.title = title;
    file.audio_tracks = stream_indices
        .into_iter()
        .zip(languages)
        .enumerate()
        .map(|(index, (stream_index, language))| AudioTrack {
            index,
            stream_index,
            language,
        })
        .collect();

    tracing::info!(
        "Probed file: {:?}, container={}, audio={}, title={:?}",
        file.path,
        file.container,
        file.audio_tracks.len(),
        file.title
    );

    Ok(file)
}
