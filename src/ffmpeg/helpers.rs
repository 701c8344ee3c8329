//! Safe wrappers around FFmpeg FFI calls.
//!
//! All `unsafe` blocks live here; callers outside this module never need to
//! touch raw FFmpeg structs.

use ffmpeg_next as ffmpeg;

/// Zero out `codec_tag` on an output stream's codec parameters, so the muxer
/// picks the tag for the target container.
///
/// Must be called after `out_stream.set_parameters(...)` and before
/// `write_header`.
pub fn stream_reset_codec_tag(out_stream: &mut ffmpeg::format::stream::StreamMut) {
    // SAFETY: the stream pointer is valid while `out_stream` lives and
    // `codecpar` is allocated by `set_parameters`. `codec_tag` is a plain u32.
    unsafe {
        (*(*out_stream.as_mut_ptr()).codecpar).codec_tag = 0;
    }
}

/// Collect a dictionary into owned key/value pairs, preserving order
pub fn dictionary_entries(dict: &ffmpeg::DictionaryRef) -> Vec<(String, String)> {
    dict.iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Build an FFmpeg dictionary from key/value pairs
pub fn to_dictionary(entries: &[(String, String)]) -> ffmpeg::Dictionary<'static> {
    let mut dict = ffmpeg::Dictionary::new();
    for (key, value) in entries {
        dict.set(key, value);
    }
    dict
}

/// Set the disposition flags (default, forced, ...) of an output stream.
///
/// `StreamMut` has no setter for this field.
pub fn stream_set_disposition(
    out_stream: &mut ffmpeg::format::stream::StreamMut,
    disposition: ffmpeg::format::stream::Disposition,
) {
    // SAFETY: the stream pointer is valid while `out_stream` lives and
    // `disposition` is a plain int field.
    unsafe {
        (*out_stream.as_mut_ptr()).disposition = disposition.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffmpeg::format::stream::Disposition;

    #[test]
    fn test_stream_set_disposition() {
        crate::ffmpeg::init().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut octx = ffmpeg::format::output(&dir.path().join("out.mkv")).unwrap();
        let mut ost = octx
            .add_stream(ffmpeg::encoder::find(ffmpeg::codec::Id::None))
            .unwrap();
        assert_eq!(ost.disposition(), Disposition::empty());

        let flags = Disposition::DEFAULT | Disposition::FORCED;
        stream_set_disposition(&mut ost, flags);
        assert_eq!(ost.disposition(), flags);
    }

    #[test]
    fn test_dictionary_round_trip_keeps_order() {
        let entries = vec![
            ("title".to_string(), "Carroyage".to_string()),
            ("IAS1".to_string(), "Francais".to_string()),
        ];
        let dict = to_dictionary(&entries);
        assert_eq!(dictionary_entries(&dict), entries);
    }
}
