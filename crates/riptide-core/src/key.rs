//! Semantic cache keys.
//!
//! Derived state is addressed by an entity-kind segment plus an optional
//! scope-id segment. The pair is stable and collision-free: two distinct
//! entities never share a key, and invalidation targets a whole kind.

use std::fmt;

/// Families of derived state kept in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Conversation summaries (unread counts, last message previews).
    ///
    /// This subsystem never writes summaries, it only marks them stale so
    /// the owning fetch pipeline refetches them.
    Conversations,
    /// Ordered message list of one conversation.
    Messages,
    /// Per-conversation typing indicator record.
    Typing,
    /// Global user-to-online map.
    Presence,
}

impl EntityKind {
    /// Stable name of the kind segment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conversations => "conversations",
            Self::Messages => "messages",
            Self::Typing => "typing",
            Self::Presence => "presence",
        }
    }
}

/// Key of one cache entry: entity kind plus optional scope id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Entity family this key belongs to.
    pub kind: EntityKind,
    /// Scope id narrowing the family, e.g. a conversation id. `None` for
    /// singleton families such as presence.
    pub scope: Option<String>,
}

impl CacheKey {
    /// Message list of `conversation_id`.
    pub fn messages(conversation_id: impl Into<String>) -> Self {
        Self { kind: EntityKind::Messages, scope: Some(conversation_id.into()) }
    }

    /// Typing record of `conversation_id`.
    pub fn typing(conversation_id: impl Into<String>) -> Self {
        Self { kind: EntityKind::Typing, scope: Some(conversation_id.into()) }
    }

    /// The global presence map.
    pub fn presence() -> Self {
        Self { kind: EntityKind::Presence, scope: None }
    }

    /// The conversation summary family.
    pub fn conversations() -> Self {
        Self { kind: EntityKind::Conversations, scope: None }
    }
}

/// Log-friendly rendering; the typed pair stays the map key.
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}/{scope}", self.kind.as_str()),
            None => f.write_str(self.kind.as_str()),
        }
    }
}
