//! Decoder error taxonomy.

use thiserror::Error;

/// Why a frame could not be decoded.
///
/// Every variant is recoverable: the frame is dropped and the stream keeps
/// running. Transport delivery is outside this subsystem's control, so there
/// is no frame-level redelivery and none of these trigger a retry.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Frame is not valid JSON or lacks the event envelope.
    #[error("malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Envelope parsed but the discriminant names no known kind.
    #[error("unknown event kind: {kind}")]
    UnknownKind {
        /// Discriminant found on the wire.
        kind: String,
    },

    /// Kind recognized but the payload does not match its shape.
    #[error("invalid {kind} payload: {source}")]
    Payload {
        /// Kind whose payload failed to decode.
        kind: &'static str,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}
