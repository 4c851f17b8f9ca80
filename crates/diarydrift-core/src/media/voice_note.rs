//! Voice note preparation.

use std::io::Cursor;

use super::{
    data_url_mime, decode_base64, encode_base64, ensure_within_limit, strip_data_url_prefix,
};
use crate::{Error, Result};

/// A recording ready to be put on a journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedVoiceNote {
    /// Base64 audio without a data-URL prefix
    pub base64: String,
    /// Known only for WAV recordings
    pub duration_ms: Option<u64>,
}

/// Encode a recording for inline storage.
///
/// Bytes are stored verbatim. Input that is already a base64 data URL (as
/// some recorders produce) has its prefix stripped instead of being encoded
/// twice.
pub fn prepare_voice_note(bytes: &[u8], max_encoded_bytes: usize) -> Result<PreparedVoiceNote> {
    if bytes.is_empty() {
        return Err(Error::Media("Voice note file is empty".to_string()));
    }

    let data_url = std::str::from_utf8(bytes)
        .ok()
        .filter(|text| data_url_mime(text).is_some());
    let (base64, duration_ms) = match data_url {
        Some(data_url) => {
            tracing::debug!("Voice note is already a data URL; stripping prefix");
            let payload = strip_data_url_prefix(data_url).trim();
            let audio = decode_base64(payload)?;
            (payload.to_string(), wav_duration_ms(&audio))
        }
        None => (encode_base64(bytes), wav_duration_ms(bytes)),
    };

    ensure_within_limit("Voice note", &base64, max_encoded_bytes)?;
    Ok(PreparedVoiceNote {
        base64,
        duration_ms,
    })
}

/// Duration of a WAV recording, `None` for anything hound cannot read.
#[must_use]
pub fn wav_duration_ms(bytes: &[u8]) -> Option<u64> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).ok()?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return None;
    }

    // `duration` counts frames, not interleaved samples
    let frames = u64::from(reader.duration());
    Some(frames.saturating_mul(1_000) / u64::from(sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::decode_base64;

    fn wav_bytes(frames: usize, channels: u16, sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..frames * usize::from(channels) {
                writer.write_sample(0_i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn wav_duration_handles_mono_and_stereo() {
        assert_eq!(wav_duration_ms(&wav_bytes(16_000, 1, 16_000)), Some(1_000));
        assert_eq!(wav_duration_ms(&wav_bytes(8_000, 2, 16_000)), Some(500));
        assert_eq!(wav_duration_ms(b"not audio"), None);
    }

    #[test]
    fn raw_recording_is_encoded_verbatim() {
        let bytes = wav_bytes(1_600, 1, 16_000);
        let note = prepare_voice_note(&bytes, usize::MAX).unwrap();

        assert_eq!(decode_base64(&note.base64).unwrap(), bytes);
        assert_eq!(note.duration_ms, Some(100));
    }

    #[test]
    fn data_url_input_is_stripped_not_reencoded() {
        let note = prepare_voice_note(b"data:audio/m4a;base64,AAAAGGZ0eXA=\n", usize::MAX).unwrap();
        assert_eq!(note.base64, "AAAAGGZ0eXA=");
        assert_eq!(note.duration_ms, None);
    }

    #[test]
    fn data_url_with_wav_payload_reports_duration() {
        let encoded = encode_base64(&wav_bytes(3_200, 1, 16_000));
        let input = format!("data:audio/wav;base64,{encoded}");
        let note = prepare_voice_note(input.as_bytes(), usize::MAX).unwrap();

        assert_eq!(note.base64, encoded);
        assert_eq!(note.duration_ms, Some(200));
    }

    #[test]
    fn data_url_with_garbage_payload_is_rejected() {
        let error =
            prepare_voice_note(b"data:audio/m4a;base64,%%% not base64 %%%", 1 << 20).unwrap_err();
        assert!(matches!(error, Error::Media(_)));
    }

    #[test]
    fn oversized_recording_is_rejected() {
        let error = prepare_voice_note(&[7_u8; 4096], 1024).unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
    }
}
