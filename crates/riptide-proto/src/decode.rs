//! Frame decoding.
//!
//! Decoding is two-step: parse the envelope (`type` discriminant plus raw
//! `payload`), then decode the payload for the recognized kind. A frame is
//! either fully usable or rejected; there is nothing in between, and
//! rejection never takes the stream down.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    DecodeError,
    event::{ErrorEvent, Message, MessagePatch, PresenceEvent, ServerEvent, TypingEvent},
};

/// Frame envelope: discriminant plus untyped payload.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

/// Decode one text frame into a typed event.
///
/// # Errors
///
/// Returns [`DecodeError`] when the frame is not JSON, carries no `type`
/// field, names an unknown kind, or carries a payload that does not match
/// the kind's shape. All of these mean "drop the frame", never "close the
/// stream".
pub fn decode(raw: &str) -> Result<ServerEvent, DecodeError> {
    let envelope: Envelope = serde_json::from_str(raw).map_err(DecodeError::Malformed)?;

    match envelope.kind.as_str() {
        "message" => payload::<Message>("message", envelope.payload).map(ServerEvent::Message),
        "message.updated" => payload::<MessagePatch>("message.updated", envelope.payload)
            .map(ServerEvent::MessageUpdated),
        "typing" => payload::<TypingEvent>("typing", envelope.payload).map(ServerEvent::Typing),
        "presence" => {
            payload::<PresenceEvent>("presence", envelope.payload).map(ServerEvent::Presence)
        },
        "error" => payload::<ErrorEvent>("error", envelope.payload).map(ServerEvent::Error),
        _ => Err(DecodeError::UnknownKind { kind: envelope.kind }),
    }
}

fn payload<T>(kind: &'static str, value: Value) -> Result<T, DecodeError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|source| DecodeError::Payload { kind, source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_message() {
        let event = decode(
            r#"{"type":"message","payload":{"id":"m1","conversationId":"c1","senderId":"u1","text":"hi","createdAt":1700000000}}"#,
        )
        .unwrap();

        let ServerEvent::Message(message) = event else {
            unreachable!("expected message event");
        };
        assert_eq!(message.id, "m1");
        assert_eq!(message.conversation_id, "c1");
        assert_eq!(message.sender_id.as_deref(), Some("u1"));
        assert_eq!(message.text.as_deref(), Some("hi"));
        assert_eq!(message.created_at, Some(1_700_000_000));
    }

    #[test]
    fn decodes_message_without_optional_fields() {
        let event =
            decode(r#"{"type":"message","payload":{"id":"m1","conversationId":"c1"}}"#).unwrap();

        let ServerEvent::Message(message) = event else {
            unreachable!("expected message event");
        };
        assert_eq!(message.sender_id, None);
        assert_eq!(message.text, None);
        assert_eq!(message.created_at, None);
    }

    #[test]
    fn decodes_message_updated() {
        let event = decode(
            r#"{"type":"message.updated","payload":{"id":"m1","conversationId":"c1","text":"hi!"}}"#,
        )
        .unwrap();

        let ServerEvent::MessageUpdated(patch) = event else {
            unreachable!("expected patch event");
        };
        assert_eq!(patch.id, "m1");
        assert_eq!(patch.text.as_deref(), Some("hi!"));
        assert_eq!(patch.sender_id, None);
    }

    #[test]
    fn decodes_typing() {
        let event = decode(
            r#"{"type":"typing","payload":{"conversationId":"c1","userId":"u1","isTyping":true}}"#,
        )
        .unwrap();

        let ServerEvent::Typing(typing) = event else {
            unreachable!("expected typing event");
        };
        assert_eq!(typing.conversation_id, "c1");
        assert_eq!(typing.user_id, "u1");
        assert!(typing.is_typing);
    }

    #[test]
    fn decodes_presence() {
        let event = decode(
            r#"{"type":"presence","payload":{"userId":"u1","online":true,"lastSeen":1700000000}}"#,
        )
        .unwrap();

        let ServerEvent::Presence(presence) = event else {
            unreachable!("expected presence event");
        };
        assert_eq!(presence.user_id, "u1");
        assert!(presence.online);
        assert_eq!(presence.last_seen, Some(1_700_000_000));
    }

    #[test]
    fn missing_online_flag_decodes_as_offline() {
        let event = decode(r#"{"type":"presence","payload":{"userId":"u1"}}"#).unwrap();

        let ServerEvent::Presence(presence) = event else {
            unreachable!("expected presence event");
        };
        assert!(!presence.online);
    }

    #[test]
    fn decodes_server_error() {
        let event = decode(r#"{"type":"error","payload":{"error":"bad_event"}}"#).unwrap();

        assert_eq!(event.kind(), "error");
        let ServerEvent::Error(report) = event else {
            unreachable!("expected error event");
        };
        assert_eq!(report.error, "bad_event");
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(decode("not json"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn rejects_missing_discriminant() {
        assert!(matches!(decode("{}"), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn rejects_unknown_kind() {
        let error = decode(r#"{"type":"bogus","payload":{}}"#);

        assert!(matches!(error, Err(DecodeError::UnknownKind { kind }) if kind == "bogus"));
    }

    #[test]
    fn rejects_incomplete_payload() {
        // Kind is known but the payload misses required fields
        let error = decode(r#"{"type":"typing","payload":{"conversationId":"c1"}}"#);

        assert!(matches!(error, Err(DecodeError::Payload { kind: "typing", .. })));
    }

    #[test]
    fn rejects_missing_payload_for_known_kind() {
        let error = decode(r#"{"type":"message"}"#);

        assert!(matches!(error, Err(DecodeError::Payload { kind: "message", .. })));
    }
}
