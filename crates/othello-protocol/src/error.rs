//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. A
//! `ProtocolError` always means a frame could not be turned into (or
//! built from) the structures in [`crate::types`]; it never means the
//! connection itself failed.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a wrong value type, or a
    /// board that is not 8×8 with cells in `0..=2`.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame parsed but lacks a field its classification requires.
    #[error("frame is missing required field `{0}`")]
    MissingField(&'static str),
}
