//! Inline media helpers.
//!
//! Photos and voice notes live inside the journal document as plain base64
//! text (no `data:` prefix). These helpers convert between files, bytes and
//! that representation and enforce the per-field size limit.

mod photo;
mod voice_note;

pub use photo::{prepare_photo, PhotoOptions, PreparedPhoto};
pub use voice_note::{prepare_voice_note, wav_duration_ms, PreparedVoiceNote};

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;

use crate::{Error, Result};

fn data_url_regex() -> &'static Regex {
    static DATA_URL: OnceLock<Regex> = OnceLock::new();
    DATA_URL.get_or_init(|| {
        Regex::new(r"^data:(?P<mime>[\w.+-]+/[\w.+-]+)?(?:;[\w.+-]+=[^;,]*)*;base64,")
            .expect("Invalid regex")
    })
}

/// Strip a leading `data:<mime>;base64,` prefix if present.
#[must_use]
pub fn strip_data_url_prefix(value: &str) -> &str {
    let value = value.trim_start();
    data_url_regex()
        .find(value)
        .map_or(value, |prefix| &value[prefix.end()..])
}

/// MIME type declared by a data URL, if `value` is one.
#[must_use]
pub fn data_url_mime(value: &str) -> Option<&str> {
    data_url_regex()
        .captures(value.trim_start())
        .and_then(|captures| captures.name("mime"))
        .map(|mime| mime.as_str())
}

#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode stored media. Accepts data URLs and ignores surrounding whitespace.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    let payload: String = strip_data_url_prefix(encoded)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(payload)
        .map_err(|error| Error::Media(format!("Invalid base64 media: {error}")))
}

/// Reject an encoded field larger than `max_bytes`.
pub fn ensure_within_limit(label: &str, encoded: &str, max_bytes: usize) -> Result<()> {
    if encoded.len() > max_bytes {
        return Err(Error::Validation(format!(
            "{label} is too large ({} KiB encoded, limit {} KiB).",
            encoded.len().div_ceil(1024),
            max_bytes / 1024
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:audio/mp4;base64,AAAA"), "AAAA");
        assert_eq!(
            strip_data_url_prefix("data:audio/webm;codecs=opus;base64,AAAA"),
            "AAAA"
        );
        assert_eq!(strip_data_url_prefix("AAAA"), "AAAA");
    }

    #[test]
    fn reads_mime_from_data_url() {
        assert_eq!(data_url_mime("data:image/jpeg;base64,/9j/"), Some("image/jpeg"));
        assert_eq!(data_url_mime("/9j/"), None);
    }

    #[test]
    fn decode_accepts_prefixed_and_wrapped_input() {
        let encoded = format!("data:text/plain;base64,{}", encode_base64(b"hello diary"));
        assert_eq!(decode_base64(&encoded).unwrap(), b"hello diary");
        assert_eq!(decode_base64("aGVs\nbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode_base64("***"), Err(Error::Media(_))));
    }

    #[test]
    fn size_limit_is_enforced() {
        assert!(ensure_within_limit("Photo", "abcd", 4).is_ok());
        let error = ensure_within_limit("Photo", &"a".repeat(2048), 1024).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Validation error: Photo is too large (2 KiB encoded, limit 1 KiB)."
        );
    }
}
