//! Error types for decoding, QR compositing, and synthesis.

use std::path::PathBuf;

use thiserror::Error;

/// Audio could not be turned into an [`AudioSignal`](crate::types::AudioSignal).
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The source file could not be opened or read.
    #[error("Failed to open audio file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The container or sample format was not recognized.
    #[error("Unsupported audio format: {0}")]
    Unsupported(String),

    /// The container had no decodable audio track.
    #[error("No audio track found")]
    NoTrack,

    /// The codec failed mid-stream.
    #[error("Audio decoding failed: {0}")]
    Codec(String),

    /// Decoding succeeded but produced no samples.
    #[error("No audio decoded from {0}")]
    Empty(String),
}

impl From<symphonia::core::errors::Error> for DecodeError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error as SymphError;
        match err {
            SymphError::Unsupported(what) => DecodeError::Unsupported(what.to_string()),
            other => DecodeError::Codec(other.to_string()),
        }
    }
}

impl From<hound::Error> for DecodeError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::FormatError(msg) => DecodeError::Unsupported(msg.to_string()),
            hound::Error::Unsupported => DecodeError::Unsupported("WAV sample format".into()),
            other => DecodeError::Codec(other.to_string()),
        }
    }
}

/// A QR image could not be fetched or decoded. Never fatal to synthesis.
#[derive(Error, Debug)]
pub enum QrError {
    /// The service URL could not be built.
    #[error("Invalid QR service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Network failure, timeout, or client construction failure.
    #[error("QR request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("QR service returned HTTP {0}")]
    Status(u16),

    /// The response body was not a decodable image.
    #[error("QR response is not an image: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure of a whole synthesis call.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The finished canvas could not be serialized to PNG.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// The embedded title font could not be parsed.
    #[error("Title font unreadable: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_wraps_transparently() {
        let err: SynthError = DecodeError::NoTrack.into();
        assert_eq!(err.to_string(), "No audio track found");
        assert!(matches!(err, SynthError::Decode(DecodeError::NoTrack)));
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(QrError::Status(502).to_string(), "QR service returned HTTP 502");
    }

    #[test]
    fn test_url_parse_error_converts() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: QrError = parse_err.into();
        assert!(matches!(err, QrError::InvalidUrl(_)));
    }
}
