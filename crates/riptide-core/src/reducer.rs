//! Event application.
//!
//! Maps each decoded [`ServerEvent`] to its cache mutations. The reducer is
//! stateless between calls: given the event and the current cache contents
//! the outcome is deterministic, and nothing here blocks or suspends.

use std::collections::HashMap;

use riptide_proto::{Message, MessagePatch, PresenceEvent, ServerEvent, TypingEvent};

use crate::{CacheKey, CacheStore, CacheValue, EntityKind};

/// Apply one event to the cache.
///
/// Merge policy per kind:
///
/// | kind | target | policy |
/// |---|---|---|
/// | `message` | message list | append, then mark conversation summaries stale |
/// | `message.updated` | message list | shallow-merge into the entry with the matching id |
/// | `typing` | typing record | replace wholesale |
/// | `presence` | presence map | merge one user, preserve the rest |
/// | `error` | none | warn log only |
///
/// Events for conversations not yet cached follow the same rules: `message`
/// creates a singleton list, `message.updated` has nothing to patch and
/// leaves the cache untouched, `typing` and `presence` write
/// unconditionally.
///
/// # Errors
///
/// Store failures propagate untouched. There is no event replay, so
/// recovery belongs to whoever owns the store.
pub fn apply<C: CacheStore>(cache: &C, event: ServerEvent) -> Result<(), C::Error> {
    match event {
        ServerEvent::Message(message) => apply_message(cache, message),
        ServerEvent::MessageUpdated(patch) => apply_patch(cache, patch),
        ServerEvent::Typing(typing) => apply_typing(cache, typing),
        ServerEvent::Presence(presence) => apply_presence(cache, presence),
        ServerEvent::Error(report) => {
            tracing::warn!(code = %report.error, "server reported stream error");
            Ok(())
        },
    }
}

fn apply_message<C: CacheStore>(cache: &C, message: Message) -> Result<(), C::Error> {
    tracing::debug!(
        conversation_id = %message.conversation_id,
        message_id = %message.id,
        "appending message"
    );
    cache.write(CacheKey::messages(message.conversation_id.clone()), |slot| match slot {
        Some(CacheValue::Messages(list)) => list.push(message),
        other => *other = Some(CacheValue::Messages(vec![message])),
    })?;

    // Unread counts and last-message previews live in the summaries the
    // fetch pipeline owns; every new message makes them stale.
    cache.invalidate(EntityKind::Conversations)
}

fn apply_patch<C: CacheStore>(cache: &C, patch: MessagePatch) -> Result<(), C::Error> {
    cache.write(CacheKey::messages(patch.conversation_id.clone()), |slot| {
        // No cached list means nothing to patch into.
        if let Some(CacheValue::Messages(list)) = slot
            && let Some(entry) = list.iter_mut().find(|message| message.id == patch.id)
        {
            patch.apply_to(entry);
        }
    })
}

fn apply_typing<C: CacheStore>(cache: &C, typing: TypingEvent) -> Result<(), C::Error> {
    cache.write(CacheKey::typing(typing.conversation_id.clone()), |slot| {
        *slot = Some(CacheValue::Typing(typing));
    })
}

fn apply_presence<C: CacheStore>(cache: &C, presence: PresenceEvent) -> Result<(), C::Error> {
    cache.write(CacheKey::presence(), |slot| match slot {
        Some(CacheValue::Presence(map)) => {
            map.insert(presence.user_id, presence.online);
        },
        other => {
            *other =
                Some(CacheValue::Presence(HashMap::from([(presence.user_id, presence.online)])));
        },
    })
}
