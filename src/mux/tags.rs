//! Translate a metadata diff into container tag edits

use std::collections::BTreeMap;

use crate::index::audio::header_language_key;
use crate::language::LanguageCatalog;
use crate::media::{MetadataDiff, VideoFile};

/// A tag assignment; `None` removes the tag
pub type TagEdit = (String, Option<String>);

/// Tag changes for one remux
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEdits {
    /// Format-level (header) tags
    pub format: Vec<TagEdit>,
    /// Stream-level tags, keyed by container stream index
    pub streams: BTreeMap<usize, Vec<TagEdit>>,
}

impl TagEdits {
    pub fn is_empty(&self) -> bool {
        self.format.is_empty() && self.streams.is_empty()
    }

    /// Edits for one stream (empty when untouched)
    pub fn for_stream(&self, stream_index: usize) -> &[TagEdit] {
        self.streams
            .get(&stream_index)
            .map(|edits| edits.as_slice())
            .unwrap_or(&[])
    }
}

/// Work out which tags must change to apply `diff` to `file`.
///
/// Titles live in the format `title` tag; an empty title removes it.
/// Languages go to each audio stream's `language` tag, except for AVI where
/// the header `IAS<n>` tags hold the language display names.
pub fn plan_tag_edits(file: &VideoFile, diff: &MetadataDiff, catalog: &LanguageCatalog) -> TagEdits {
    let mut edits = TagEdits::default();

    if let Some(title) = &diff.title {
        let value = if title.is_empty() {
            None
        } else {
            Some(title.clone())
        };
        edits.format.push(("title".to_string(), value));
    }

    if let Some(languages) = &diff.languages {
        for (track, language) in file.audio_tracks.iter().zip(languages) {
            if file.container.stores_languages_in_header() {
                edits.format.push((
                    header_language_key(track.index),
                    Some(catalog.display_name(language).to_string()),
                ));
            } else {
                edits
                    .streams
                    .entry(track.stream_index)
                    .or_default()
                    .push(("language".to_string(), Some(language.to_string())));
            }
        }
    }

    edits
}

/// Apply `edits` to an existing tag list, keeping the original order.
///
/// Replaced tags stay in place, removed tags are dropped and new tags are
/// appended.
pub fn apply_edits<I>(existing: I, edits: &[TagEdit]) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut tags: Vec<(String, String)> = Vec::new();
    for (key, value) in existing {
        match edits.iter().rev().find(|(k, _)| *k == key) {
            Some((_, Some(new_value))) => tags.push((key, new_value.clone())),
            Some((_, None)) => {}
            None => tags.push((key, value)),
        }
    }
    for (key, value) in edits {
        if let Some(value) = value {
            if !tags.iter().any(|(k, _)| k == key) {
                tags.push((key.clone(), value.clone()));
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::fixtures::video_file;
    use crate::media::ContainerFormat;

    fn owned(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_stream_language_edits() {
        let catalog = LanguageCatalog::builtin();
        let file = video_file("/films/a.mkv", ContainerFormat::Matroska, &["und", "eng"], None);
        let diff = MetadataDiff {
            title: None,
            languages: Some(vec![
                catalog.normalize("jpn").unwrap(),
                catalog.normalize("eng").unwrap(),
            ]),
        };
        let edits = plan_tag_edits(&file, &diff, &catalog);
        assert!(edits.format.is_empty());
        // fixture streams start at 1, after the video stream
        assert_eq!(
            edits.for_stream(1),
            &[("language".to_string(), Some("jpn".to_string()))]
        );
        assert_eq!(
            edits.for_stream(2),
            &[("language".to_string(), Some("eng".to_string()))]
        );
        assert!(edits.for_stream(0).is_empty());
    }

    #[test]
    fn test_avi_language_edits_use_header_names() {
        let catalog = LanguageCatalog::builtin();
        let file = video_file("/films/1976 - carroyage.avi", ContainerFormat::Avi, &["und"], None);
        let diff = MetadataDiff {
            title: Some("carroyage".to_string()),
            languages: Some(vec![catalog.normalize("fra").unwrap()]),
        };
        let edits = plan_tag_edits(&file, &diff, &catalog);
        assert!(edits.streams.is_empty());
        assert_eq!(
            edits.format,
            vec![
                ("title".to_string(), Some("carroyage".to_string())),
                ("IAS1".to_string(), Some("Francais".to_string())),
            ]
        );
    }

    #[test]
    fn test_empty_title_removes_tag() {
        let catalog = LanguageCatalog::builtin();
        let file = video_file("/films/a.mp4", ContainerFormat::Mp4, &[], Some("Old"));
        let diff = MetadataDiff {
            title: Some(String::new()),
            languages: None,
        };
        let edits = plan_tag_edits(&file, &diff, &catalog);
        assert_eq!(edits.format, vec![("title".to_string(), None)]);
        assert!(plan_tag_edits(&file, &MetadataDiff::new(), &catalog).is_empty());
    }

    #[test]
    fn test_apply_edits() {
        let existing = owned(&[("encoder", "Lavf"), ("title", "Old"), ("IAS1", "English")]);
        let edits = vec![
            ("title".to_string(), Some("New".to_string())),
            ("IAS1".to_string(), None),
            ("IAS2".to_string(), Some("Korean".to_string())),
        ];
        assert_eq!(
            apply_edits(existing, &edits),
            owned(&[("encoder", "Lavf"), ("title", "New"), ("IAS2", "Korean")])
        );
    }

    #[test]
    fn test_apply_no_edits_keeps_tags() {
        let existing = owned(&[("language", "und"), ("handler_name", "SoundHandler")]);
        assert_eq!(apply_edits(existing.clone(), &[]), existing);
    }
}
