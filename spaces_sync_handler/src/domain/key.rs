//! Pure helpers for turning an s3 object key into the values the pipeline needs.

use std::borrow::Cow;

use anyhow::Context;

use crate::domain::models::{RecordId, TransferErr};

/// S3 notifications url encode the key and use `+` for spaces instead of `%20`
pub fn decode_object_key(encoded_key: &str) -> Result<String, TransferErr> {
    let spaced: Cow<'_, str> = if encoded_key.contains('+') {
        Cow::Owned(encoded_key.replace('+', " "))
    } else {
        Cow::Borrowed(encoded_key)
    };

    if let Some(position) = malformed_escape(&spaced) {
        return Err(TransferErr::DecodeKey {
            cause: anyhow::anyhow!("malformed percent escape at byte {position}"),
        });
    }

    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .context("decoded key is not valid UTF-8")
        .map_err(|cause| TransferErr::DecodeKey { cause })
}

/// Position of the first `%` that is not followed by two hex digits.
/// `urlencoding` passes those through untouched.
fn malformed_escape(key: &str) -> Option<usize> {
    let bytes = key.as_bytes();
    bytes.iter().enumerate().find_map(|(i, b)| {
        let well_formed = bytes
            .get(i + 1..i + 3)
            .is_some_and(|digits| digits.iter().all(u8::is_ascii_hexdigit));
        (*b == b'%' && !well_formed).then_some(i)
    })
}

/// sub_folder/filename.mp4 => filename.mp4
pub fn get_filename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Pulls the record id out of a filename, xxx_60.mp4 => 60
///
/// The extension is everything after the last `.` and the id is everything after the
/// last `_` of what remains. The result is not validated.
pub fn record_id_from_filename(filename: &str) -> RecordId {
    let stem = filename
        .rsplit_once('.')
        .map_or(filename, |(stem, _extension)| stem);
    let id = stem.rsplit('_').next().unwrap_or(stem);
    RecordId::new(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cool_asserts::assert_matches;

    #[test]
    fn plus_becomes_space() {
        assert_eq!(decode_object_key("my+video_1.mp4").unwrap(), "my video_1.mp4");
    }

    #[test]
    fn plus_is_replaced_before_percent_decoding() {
        // %2B is a literal plus and must survive
        assert_eq!(
            decode_object_key("a+b%2Bc_3.mp4").unwrap(),
            "a b+c_3.mp4"
        );
    }

    #[test]
    fn percent_sequences_decode() {
        assert_eq!(
            decode_object_key("folder%2Fsub/caf%C3%A9_9.mov").unwrap(),
            "folder/sub/café_9.mov"
        );
    }

    #[test]
    fn plain_key_is_unchanged() {
        assert_eq!(decode_object_key("folder/clip_42.mp4").unwrap(), "folder/clip_42.mp4");
    }

    #[test]
    fn malformed_escape_is_a_decode_failure() {
        assert_matches!(
            decode_object_key("bad%ZZ_1.mp4"),
            Err(TransferErr::DecodeKey { .. })
        );
        assert_matches!(
            decode_object_key("bad_1.mp4%"),
            Err(TransferErr::DecodeKey { .. })
        );
        assert_matches!(
            decode_object_key("bad_1.mp4%4"),
            Err(TransferErr::DecodeKey { .. })
        );
    }

    #[test]
    fn escaped_percent_decodes() {
        assert_eq!(decode_object_key("100%25_9.mp4").unwrap(), "100%_9.mp4");
    }

    #[test]
    fn invalid_utf8_is_a_decode_failure() {
        assert_matches!(
            decode_object_key("bad%FF_1.mp4"),
            Err(TransferErr::DecodeKey { .. })
        );
    }

    #[test]
    fn filename_strips_directories() {
        assert_eq!(get_filename("a/b/c/video_60.mp4"), "video_60.mp4");
        assert_eq!(get_filename("video_60.mp4"), "video_60.mp4");
        assert_eq!(get_filename("folder/"), "");
    }

    #[test]
    fn record_id_is_suffix_after_last_underscore() {
        assert_eq!(record_id_from_filename("video_60.mp4").as_str(), "60");
        assert_eq!(record_id_from_filename("clip.final_7.mov").as_str(), "7");
        assert_eq!(record_id_from_filename("my_long_name_123.mp4").as_str(), "123");
    }

    #[test]
    fn record_id_is_not_validated() {
        assert_eq!(record_id_from_filename("video.mp4").as_str(), "video");
        assert_eq!(record_id_from_filename("video_60").as_str(), "60");
        assert_eq!(record_id_from_filename("video_.mp4").as_str(), "");
        assert_eq!(record_id_from_filename("").as_str(), "");
    }
}
