//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire frames.
///
/// Each crate in the workspace owns its error enum, so a `ProtocolError`
/// always means "the bytes were wrong", never "the room was wrong".
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an event into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown event name,
    /// or a payload missing required fields.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but violates a protocol rule (for example an
    /// empty room identifier).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
