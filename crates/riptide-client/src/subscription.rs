//! Subscription identity.

use url::Url;

use crate::SubscribeError;

/// Fixed server endpoint for the chat stream.
const ENDPOINT: &str = "/ws/chat";

/// Identity of one server-side event stream.
///
/// The triple is compared as a whole: changing the token, the conversation
/// scope, or the origin produces a different identity and therefore
/// requires a different connection. There is no partial re-subscription on
/// a live socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    base_url: String,
    token: String,
    conversation_id: Option<String>,
}

impl Subscription {
    /// Subscribe to every conversation visible to `token`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), token: token.into(), conversation_id: None }
    }

    /// Narrow the stream to a single conversation.
    #[must_use]
    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    /// Origin the socket scheme is derived from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Access token carried in the socket query.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Conversation scope, when narrowed.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Socket endpoint for this subscription.
    ///
    /// The scheme is derived deterministically from the origin (`https`
    /// becomes `wss`, anything else `ws`), the path is the fixed
    /// `/ws/chat` endpoint, and the query carries `token` always and
    /// `conversationId` only when the stream is scoped.
    ///
    /// # Errors
    ///
    /// Returns [`SubscribeError::BaseUrl`] when the origin does not parse
    /// and [`SubscribeError::SocketScheme`] when its scheme cannot be
    /// rewritten to a socket scheme (non-web origins such as `file:`).
    pub fn socket_url(&self) -> Result<Url, SubscribeError> {
        let mut url = Url::parse(&self.base_url)?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|()| SubscribeError::SocketScheme { base_url: self.base_url.clone() })?;
        url.set_path(ENDPOINT);
        url.set_query(None);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("token", &self.token);
            if let Some(conversation_id) = &self.conversation_id {
                query.append_pair("conversationId", conversation_id);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn https_origin_becomes_wss() {
        let url = Subscription::new("https://chat.example.com", "t0k3n").socket_url().unwrap();

        assert_eq!(url.as_str(), "wss://chat.example.com/ws/chat?token=t0k3n");
    }

    #[test]
    fn http_origin_becomes_ws() {
        let url = Subscription::new("http://localhost:8080", "t0k3n").socket_url().unwrap();

        assert_eq!(url.as_str(), "ws://localhost:8080/ws/chat?token=t0k3n");
    }

    #[test]
    fn conversation_scope_lands_in_the_query() {
        let url = Subscription::new("http://localhost:8080", "t0k3n")
            .with_conversation("c1")
            .socket_url()
            .unwrap();

        assert_eq!(url.query(), Some("token=t0k3n&conversationId=c1"));
    }

    #[test]
    fn tokens_are_query_encoded() {
        let url = Subscription::new("http://localhost:8080", "a b&c").socket_url().unwrap();

        assert_eq!(url.query(), Some("token=a+b%26c"));
    }

    #[test]
    fn existing_path_and_query_are_replaced() {
        let url = Subscription::new("https://chat.example.com/app?tab=inbox", "t0k3n")
            .socket_url()
            .unwrap();

        assert_eq!(url.path(), "/ws/chat");
        assert_eq!(url.query(), Some("token=t0k3n"));
    }

    #[test]
    fn non_web_origin_is_rejected() {
        let result = Subscription::new("data:text/plain,hello", "t0k3n").socket_url();

        assert!(matches!(result, Err(SubscribeError::SocketScheme { .. })));
    }

    #[test]
    fn identity_is_the_whole_triple() {
        let base = Subscription::new("http://localhost:8080", "t0k3n");

        assert_eq!(base, base.clone());
        assert_ne!(base, Subscription::new("http://localhost:8080", "other"));
        assert_ne!(base, Subscription::new("http://localhost:9090", "t0k3n"));
        assert_ne!(base, base.clone().with_conversation("c1"));
    }
}
