//! Stream-copy remuxer
//!
//! Copies every stream of the source into a new container of the same kind,
//! without re-encoding, while rewriting the format and stream tags. Stream
//! dispositions and chapters are carried over unchanged.

use std::path::Path;

use ffmpeg_next as ffmpeg;

use crate::error::FfmpegError;
use crate::ffmpeg::helpers::{
    dictionary_entries, stream_reset_codec_tag, stream_set_disposition, to_dictionary,
};

use super::tags::{apply_edits, TagEdits};

/// A source chapter, as recreated in the output
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterCopy {
    pub id: i64,
    pub time_base: ffmpeg::Rational,
    pub start: i64,
    pub end: i64,
    /// Value of the `title` tag, empty when absent
    pub title: String,
    /// Every other chapter tag, in source order
    pub tags: Vec<(String, String)>,
}

impl ChapterCopy {
    pub fn new(
        id: i64,
        time_base: ffmpeg::Rational,
        start: i64,
        end: i64,
        tags: Vec<(String, String)>,
    ) -> Self {
        let (titles, tags): (Vec<_>, Vec<_>) = tags.into_iter().partition(|(key, _)| key == "title");
        Self {
            id,
            time_base,
            start,
            end,
            title: titles.into_iter().next().map(|(_, value)| value).unwrap_or_default(),
            tags,
        }
    }

    fn from_chapter(chapter: &ffmpeg::format::chapter::Chapter) -> Self {
        Self::new(
            chapter.id(),
            chapter.time_base(),
            chapter.start(),
            chapter.end(),
            dictionary_entries(&chapter.metadata()),
        )
    }

    fn add_to(&self, octx: &mut ffmpeg::format::context::Output) -> Result<(), FfmpegError> {
        let mut chapter = octx
            .add_chapter(self.id, self.time_base, self.start, self.end, &self.title)
            .map_err(|e| FfmpegError::StreamConfig(format!("chapter {}: {}", self.id, e)))?;
        for (key, value) in &self.tags {
            chapter.set_metadata(key, value);
        }
        Ok(())
    }
}

/// Remux `src` into `dst` applying `edits` to the tags.
///
/// The output format is chosen from the extension of `dst`.
pub fn remux_with_tags(src: &Path, dst: &Path, edits: &TagEdits) -> Result<(), FfmpegError> {
    crate::ffmpeg::init()?;

    let mut ictx = ffmpeg::format::input(src)
        .map_err(|e| FfmpegError::OpenInput(format!("{}: {}", src.display(), e)))?;
    let mut octx = ffmpeg::format::output(dst)
        .map_err(|e| FfmpegError::OpenOutput(format!("{}: {}", dst.display(), e)))?;

    let stream_count = ictx.nb_streams() as usize;
    let mut stream_mapping: Vec<Option<usize>> = vec![None; stream_count];
    let mut input_time_bases = vec![ffmpeg::Rational::new(0, 1); stream_count];

    for ist in ictx.streams() {
        let ist_index = ist.index();
        let mut ost = octx
            .add_stream(ffmpeg::encoder::find(ffmpeg::codec::Id::None))
            .map_err(|e| {
                FfmpegError::StreamConfig(format!("stream {}: {}", ist_index, e))
            })?;
        ost.set_parameters(ist.parameters());
        stream_reset_codec_tag(&mut ost);
        stream_set_disposition(&mut ost, ist.disposition());

        let tags = apply_edits(dictionary_entries(&ist.metadata()), edits.for_stream(ist_index));
        ost.set_metadata(to_dictionary(&tags));

        stream_mapping[ist_index] = Some(ost.index());
        input_time_bases[ist_index] = ist.time_base();
    }

    let header = apply_edits(dictionary_entries(&ictx.metadata()), &edits.format);
    octx.set_metadata(to_dictionary(&header));

    let chapters: Vec<ChapterCopy> = ictx.chapters().map(|c| ChapterCopy::from_chapter(&c)).collect();
    for chapter in &chapters {
        chapter.add_to(&mut octx)?;
    }

    octx.write_header()
        .map_err(|e| FfmpegError::WriteHeader(e.to_string()))?;

    let mut packets = 0u64;
    for (stream, mut packet) in ictx.packets() {
        let ist_index = stream.index();
        let Some(ost_index) = stream_mapping.get(ist_index).copied().flatten() else {
            continue;
        };
        let ost_time_base = octx
            .stream(ost_index)
            .map(|s| s.time_base())
            .ok_or_else(|| FfmpegError::WritePacket(format!("missing output stream {}", ost_index)))?;

        packet.rescale_ts(input_time_bases[ist_index], ost_time_base);
        packet.set_position(-1);
        packet.set_stream(ost_index);
        packet
            .write_interleaved(&mut octx)
            .map_err(|e| FfmpegError::WritePacket(e.to_string()))?;
        packets += 1;
    }

    octx.write_trailer()
        .map_err(|e| FfmpegError::WriteTrailer(e.to_string()))?;

    tracing::debug!(
        "Remuxed {:?} -> {:?}: {} streams, {} chapters, {} packets",
        src,
        dst,
        stream_count,
        chapters.len(),
        packets
    );
    Ok(())
}
