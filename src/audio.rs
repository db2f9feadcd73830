use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::CollectorError;

/// Required data URL prefix; anything else is rejected before decoding
pub const AUDIO_DATA_URL_PREFIX: &str = "data:audio/";

/// Decoded audio payload.
///
/// The original base64 text is kept alongside the bytes because the database
/// backend persists that form directly instead of re-encoding.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub base64: String,
}

/// Decode a browser-recorded `data:audio/...;base64,<payload>` string.
///
/// Each step is a distinct failure: missing separator, non-audio prefix,
/// invalid base64, decoded size over `max_bytes`.
pub fn decode_audio_data_url(
    audio_data: &str,
    max_bytes: usize,
) -> Result<AudioPayload, CollectorError> {
    let (header, encoded) = audio_data
        .split_once(',')
        .ok_or(CollectorError::MalformedAudioFormat)?;

    if !header.starts_with(AUDIO_DATA_URL_PREFIX) {
        return Err(CollectorError::NotAudioContent);
    }

    let bytes = BASE64.decode(encoded)?;

    if bytes.len() > max_bytes {
        return Err(CollectorError::AudioTooLarge {
            limit_mb: max_bytes / (1024 * 1024),
        });
    }

    Ok(AudioPayload {
        bytes,
        base64: encoded.to_string(),
    })
}

/// Decode an audio payload already persisted as base64 text.
/// A failure here is a storage corruption, not a client error.
pub fn decode_stored_base64(encoded: &str) -> Result<Vec<u8>, CollectorError> {
    BASE64
        .decode(encoded)
        .map_err(|e| CollectorError::StorageWrite(format!("stored audio is not valid base64: {}", e)))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 10 * 1024 * 1024;

    fn data_url(bytes: &[u8]) -> String {
        format!("data:audio/webm;codecs=opus;base64,{}", encode_base64(bytes))
    }

    #[test]
    fn test_roundtrip() {
        let original: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let payload = decode_audio_data_url(&data_url(&original), MAX).unwrap();
        assert_eq!(payload.bytes, original);
        assert_eq!(payload.base64, encode_base64(&original));
    }

    #[test]
    fn test_missing_separator() {
        let err = decode_audio_data_url("data:audio/webm;base64", MAX).unwrap_err();
        assert!(matches!(err, CollectorError::MalformedAudioFormat));
    }

    #[test]
    fn test_non_audio_prefix() {
        let encoded = encode_base64(b"pixels");
        let url = format!("data:image/png;base64,{}", encoded);
        let err = decode_audio_data_url(&url, MAX).unwrap_err();
        assert!(matches!(err, CollectorError::NotAudioContent));
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_audio_data_url("data:audio/webm;base64,@@not-base64@@", MAX).unwrap_err();
        assert!(matches!(err, CollectorError::Base64Decode(_)));
    }

    #[test]
    fn test_size_limit() {
        let big = vec![0u8; 1025];
        let err = decode_audio_data_url(&data_url(&big), 1024).unwrap_err();
        assert!(matches!(err, CollectorError::AudioTooLarge { .. }));

        // Exactly at the limit is accepted
        let at_limit = vec![0u8; 1024];
        assert!(decode_audio_data_url(&data_url(&at_limit), 1024).is_ok());
    }
}
