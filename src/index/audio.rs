//! Audio track language extraction
//!
//! Most containers tag each audio stream with a `language` code. AVI cannot
//! store that in the streams, so its header carries `IAS<n>` tags (1-based)
//! holding language display names instead.

use std::collections::BTreeMap;

use ffmpeg_next as ffmpeg;

use crate::language::{LanguageCatalog, LanguageCode};

/// Header tag prefix for AVI audio stream languages
pub const HEADER_LANGUAGE_PREFIX: &str = "IAS";

/// Extract language from stream metadata
pub fn get_stream_language(stream: &ffmpeg::Stream) -> Option<String> {
    stream
        .metadata()
        .get("language")
        .map(|s| s.to_string())
}

/// Header tag name for the audio track at `index` (0-based)
pub fn header_language_key(index: usize) -> String {
    format!("{}{}", HEADER_LANGUAGE_PREFIX, index + 1)
}

/// Collect `IAS<n>` header tags, keyed by 0-based track index
pub fn header_language_tags<'a, I>(entries: I) -> BTreeMap<usize, String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let number = key.strip_prefix(HEADER_LANGUAGE_PREFIX)?;
            if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let position: usize = number.parse().ok()?;
            let index = position.checked_sub(1)?;
            Some((index, value.trim().to_string()))
        })
        .collect()
}

/// Combine stream tags and header tags into one language per track.
///
/// A stream tag wins when present; otherwise the header name is used; a track
/// with neither is `und`. When both exist they must name the same language.
pub fn merge_track_languages(
    catalog: &LanguageCatalog,
    stream_tags: &[Option<String>],
    header_tags: &BTreeMap<usize, String>,
) -> Result<Vec<LanguageCode>, String> {
    if header_tags.len() > stream_tags.len() {
        return Err(format!(
            "the number of audio streams found in the header ({}) doesn't match the actual number of audio streams ({})",
            header_tags.len(),
            stream_tags.len()
        ));
    }
    if let Some(index) = header_tags.keys().find(|i| **i >= stream_tags.len()) {
        return Err(format!(
            "header tag {} references a non-existing audio stream",
            header_language_key(*index)
        ));
    }

    let mut languages = Vec::with_capacity(stream_tags.len());
    for (index, stream_tag) in stream_tags.iter().enumerate() {
        let from_stream = match stream_tag.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => Some(
                catalog
                    .from_container_tag(tag)
                    .ok_or_else(|| format!("unexpected language iso : {}", tag))?,
            ),
            _ => None,
        };
        let from_header = match header_tags.get(&index) {
            Some(name) if !name.is_empty() => Some(
                catalog
                    .from_display_name(name)
                    .ok_or_else(|| format!("unexpected language name : {}", name))?,
            ),
            _ => None,
        };

        let language = match (from_stream, from_header) {
            (Some(stream), Some(header)) if stream != header => {
                return Err(format!(
                    "audio track #{} is tagged {} in its stream but {} in the header",
                    index, stream, header
                ));
            }
            (Some(stream), _) => stream,
            (None, Some(header)) => header,
            (None, None) => catalog.undefined(),
        };
        languages.push(language);
    }
    Ok(languages)
}
