//! Connection lifecycle.
//!
//! One [`connect`] call owns one WebSocket for one [`Subscription`]
//! identity. Inbound text frames run through decode and apply on a single
//! reader task; everything else about the transport (pings, binary frames)
//! is handled below this layer or ignored.
//!
//! There is deliberately no reconnect here: a dropped stream stops
//! delivering events and nothing more. Resilience layers on top, see
//! [`crate::Reconnector`].

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use futures::StreamExt;
use riptide_core::CacheStore;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};

use crate::{SubscribeError, Subscription};

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Handle to a live chat stream.
///
/// Scoped acquisition: dropping the handle stops the stream, so the
/// connection is released on every exit path of its owning context.
#[derive(Debug)]
pub struct ChatConnection {
    closed: Arc<AtomicBool>,
    abort: tokio::task::AbortHandle,
}

impl ChatConnection {
    /// Stop the stream. Idempotent; safe to call any number of times.
    ///
    /// After this returns, no further event is dispatched into the cache,
    /// even for frames the transport had already delivered.
    pub fn stop(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!("chat stream stopped");
        }
        self.abort.abort();
    }

    /// Whether the stream has stopped delivering events.
    ///
    /// True after [`stop`](Self::stop), and also once the server closes or
    /// the transport fails; a dead connection is observable only here,
    /// never as a synthesized error event.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for ChatConnection {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Open the stream for `subscription` and dispatch its events into `cache`.
///
/// Returns once the WebSocket handshake completes; event flow continues on
/// a background reader until the stream ends or the handle is stopped.
///
/// # Errors
///
/// Returns [`SubscribeError`] when the socket URL cannot be built or the
/// handshake fails. This call never retries; wrap it in a
/// [`crate::Reconnector`] for backoff.
pub async fn connect<C>(
    subscription: &Subscription,
    cache: C,
) -> Result<ChatConnection, SubscribeError>
where
    C: CacheStore + Send + Sync + 'static,
{
    let stream = open_stream(subscription).await?;
    let closed = Arc::new(AtomicBool::new(false));

    let gate = Arc::clone(&closed);
    let task = tokio::spawn(async move {
        read_loop(stream, &cache, &gate).await;
        // Stream ended on its own; flip the gate so the handle reports it.
        gate.store(true, Ordering::SeqCst);
    });

    Ok(ChatConnection { closed, abort: task.abort_handle() })
}

/// Perform the WebSocket handshake for `subscription`.
pub(crate) async fn open_stream(subscription: &Subscription) -> Result<WsStream, SubscribeError> {
    let url = subscription.socket_url()?;
    let (stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| SubscribeError::Connect(e.to_string()))?;
    info!(conversation_id = ?subscription.conversation_id(), "chat stream connected");
    Ok(stream)
}

/// Drive one stream until it ends.
///
/// Frames are processed strictly one at a time in delivery order. Returns
/// when the server closes, the transport fails, or the cache rejects a
/// write; the caller owns what happens next.
pub(crate) async fn read_loop<C: CacheStore>(mut stream: WsStream, cache: &C, closed: &AtomicBool) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                if dispatch(cache, closed, text.as_str()).is_err() {
                    // No replay exists, so a failed write cannot be made
                    // good by continuing; stop feeding the cache.
                    break;
                }
            },
            Ok(WsMessage::Close(_)) => {
                info!("server closed the chat stream");
                break;
            },
            // Binary frames carry no chat events; ping/pong is transport
            // housekeeping handled by tungstenite.
            Ok(_) => {},
            Err(e) => {
                warn!(error = %e, "chat stream failed");
                break;
            },
        }
    }
    debug!("chat read loop ended");
}

/// Run one frame through decode and apply, gated on teardown.
fn dispatch<C: CacheStore>(cache: &C, closed: &AtomicBool, raw: &str) -> Result<(), C::Error> {
    if closed.load(Ordering::SeqCst) {
        return Ok(());
    }
    match riptide_proto::decode(raw) {
        Ok(event) => {
            if let Err(e) = riptide_core::apply(cache, event) {
                error!(error = %e, "cache rejected event");
                return Err(e);
            }
            Ok(())
        },
        Err(e) => {
            // Malformed or unknown frames are dropped, never fatal.
            warn!(error = %e, "dropping undecodable frame");
            Ok(())
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use riptide_core::{CacheKey, CacheValue, MemoryStore};

    use super::*;

    const MESSAGE_FRAME: &str =
        r#"{"type":"message","payload":{"id":"m1","conversationId":"c1","text":"hi"}}"#;

    #[test]
    fn dispatch_applies_valid_frames() {
        let store = MemoryStore::new();
        let closed = AtomicBool::new(false);

        dispatch(&store, &closed, MESSAGE_FRAME).unwrap();

        assert!(matches!(
            store.read(&CacheKey::messages("c1")).unwrap(),
            Some(CacheValue::Messages(list)) if list.len() == 1
        ));
    }

    #[test]
    fn dispatch_after_teardown_mutates_nothing() {
        let store = MemoryStore::new();
        let closed = AtomicBool::new(true);

        // A frame the transport delivered late must not land in the cache.
        dispatch(&store, &closed, MESSAGE_FRAME).unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn dispatch_drops_undecodable_frames() {
        let store = MemoryStore::new();
        let closed = AtomicBool::new(false);

        dispatch(&store, &closed, "not json").unwrap();
        dispatch(&store, &closed, "{}").unwrap();
        dispatch(&store, &closed, r#"{"type":"bogus","payload":{}}"#).unwrap();

        assert!(store.is_empty());
    }
}
