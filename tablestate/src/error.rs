//! Errors returned by the fallible codec entry points
//!
//! The manager and the lenient [`decode`](crate::codec::decode) never fail; these
//! errors are only visible through [`try_decode`](crate::codec::try_decode) and
//! [`try_encode`](crate::codec::try_encode), for diagnostics.
//!
use snafu::prelude::*;

/// Errors returned by tablestate crate
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TableStateError {
    /// The parameter is not valid base64 (url-safe alphabet, no padding).
    #[snafu(display("Invalid base64 in view-state parameter: {source}"))]
    Base64 { source: base64::DecodeError },

    /// The decoded bytes are not a valid DEFLATE stream.
    #[snafu(display("Failed to inflate view-state parameter: {source}"))]
    Inflate { source: std::io::Error },

    /// Compressing the serialized state failed.
    #[snafu(display("Failed to deflate view state: {source}"))]
    Deflate { source: std::io::Error },

    /// The inflated payload exceeds the size cap.
    #[snafu(display("View-state payload exceeds {limit} bytes"))]
    TooLarge { limit: u64 },

    /// The inflated payload is not UTF-8.
    #[snafu(display("View-state payload is not UTF-8: {source}"))]
    Utf8 { source: std::string::FromUtf8Error },

    /// The payload is not JSON.
    #[snafu(display("View-state payload is not valid JSON: {source}"))]
    Json { source: serde_json::Error },

    /// The payload is JSON, but not an object.
    #[snafu(display("View-state payload is not a JSON object (found {found})"))]
    NotAnObject { found: String },

    /// Serialization error. unlikely to occur. If you see this error, please report it as a bug.
    #[snafu(display("Serialization: {source}"))]
    Serialization { source: serde_json::Error },
}
