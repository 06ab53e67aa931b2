//! Typed events delivered by the chat stream.
//!
//! Payload field names are camelCase on the wire. Fields that older servers
//! omit are optional and skipped when absent, so the same types round-trip
//! against both the current broadcast shape and the reduced one.

use serde::{Deserialize, Serialize};

/// All events the server can deliver on the chat stream.
///
/// # Invariants
///
/// - Kind Uniqueness: each variant maps to exactly one wire discriminant,
///   returned by [`kind`](Self::kind) and matched by the decoder. Adding a
///   kind means extending this enum and every dispatch site; exhaustive
///   matching turns a missed site into a compile error.
///
/// - Scoping: every conversation-scoped variant carries a conversation id,
///   and every user-scoped variant carries a user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// New message appended to a conversation.
    Message(Message),
    /// Patch for a message that already exists.
    MessageUpdated(MessagePatch),
    /// Typing indicator change in a conversation.
    Typing(TypingEvent),
    /// Online/offline change for a user.
    Presence(PresenceEvent),
    /// In-band error report from the server.
    Error(ErrorEvent),
}

impl ServerEvent {
    /// Wire discriminant for this event.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::MessageUpdated(_) => "message.updated",
            Self::Typing(_) => "typing",
            Self::Presence(_) => "presence",
            Self::Error(_) => "error",
        }
    }
}

/// A message in a conversation.
///
/// Identified by `id`, unique within its conversation. Created by `message`
/// events and mutated in place by `message.updated` patches; never deleted
/// by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique id within the conversation.
    pub id: String,
    /// Conversation this message belongs to.
    pub conversation_id: String,
    /// Author of the message. Older servers omit this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    /// Message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Creation time, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// Field-level patch for an existing message.
///
/// The optional fields form the shallow-merge set: a field present in the
/// patch overwrites the stored value, an absent field leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePatch {
    /// Id of the message to patch.
    pub id: String,
    /// Conversation containing the message.
    pub conversation_id: String,
    /// New author attribution, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    /// New message body, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New creation time, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl MessagePatch {
    /// Shallow-merge this patch into `message`.
    pub fn apply_to(&self, message: &mut Message) {
        if let Some(sender_id) = &self.sender_id {
            message.sender_id = Some(sender_id.clone());
        }
        if let Some(text) = &self.text {
            message.text = Some(text.clone());
        }
        if let Some(created_at) = self.created_at {
            message.created_at = Some(created_at);
        }
    }
}

/// Last-known typing state for one user in one conversation.
///
/// Typing events replace the whole per-conversation record: staleness is
/// cheap for typing, so last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingEvent {
    /// Conversation the indicator belongs to.
    pub conversation_id: String,
    /// User whose typing state changed.
    pub user_id: String,
    /// Whether the user is currently typing.
    pub is_typing: bool,
}

/// Presence change for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEvent {
    /// User whose presence changed.
    pub user_id: String,
    /// Online flag. A missing flag decodes as offline.
    #[serde(default)]
    pub online: bool,
    /// Last time the user was seen, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<i64>,
}

/// In-band error report from the server.
///
/// The server acknowledges bad input with codes such as `bad_event` or
/// `save_failed` instead of closing the socket. Carries no cache effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Short machine-readable error code.
    pub error: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message(text: Option<&str>) -> Message {
        Message {
            id: "m1".into(),
            conversation_id: "c1".into(),
            sender_id: None,
            text: text.map(Into::into),
            created_at: None,
        }
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let mut target = message(Some("hi"));
        target.sender_id = Some("u1".into());

        let patch = MessagePatch {
            id: "m1".into(),
            conversation_id: "c1".into(),
            sender_id: None,
            text: Some("hi!".into()),
            created_at: Some(1_700_000_000),
        };
        patch.apply_to(&mut target);

        assert_eq!(target.text.as_deref(), Some("hi!"));
        assert_eq!(target.created_at, Some(1_700_000_000));
        // Absent patch fields leave stored values untouched
        assert_eq!(target.sender_id.as_deref(), Some("u1"));
    }

    #[test]
    fn empty_patch_is_identity() {
        let mut target = message(Some("hi"));
        let before = target.clone();

        let patch = MessagePatch {
            id: "m1".into(),
            conversation_id: "c1".into(),
            sender_id: None,
            text: None,
            created_at: None,
        };
        patch.apply_to(&mut target);

        assert_eq!(target, before);
    }

    #[test]
    fn optional_message_fields_skip_serialization() {
        let json = serde_json::to_value(message(Some("hi"))).unwrap();
        let object = json.as_object().unwrap();

        assert!(object.contains_key("conversationId"));
        assert!(!object.contains_key("senderId"));
        assert!(!object.contains_key("createdAt"));
    }
}
