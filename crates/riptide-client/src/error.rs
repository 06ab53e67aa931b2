//! Subscription errors.

use thiserror::Error;

/// Errors establishing a chat subscription.
///
/// Decode and cache failures never appear here: undecodable frames are
/// dropped inside the reader, and a cache failure surfaces to whoever owns
/// the store. A connection that drops after being established is not an
/// error either, only a cessation of events.
#[derive(Debug, Error)]
pub enum SubscribeError {
    /// Base URL did not parse.
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// Base URL scheme cannot be rewritten to a socket scheme.
    #[error("cannot derive socket scheme for {base_url}")]
    SocketScheme {
        /// Origin the subscription was built with.
        base_url: String,
    },

    /// WebSocket handshake failed.
    #[error("connection failed: {0}")]
    Connect(String),
}
