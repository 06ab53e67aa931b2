//! The cache adapter seam.
//!
//! The reducer never talks to a concrete cache library. It goes through
//! [`CacheStore`], which any surrounding query-cache can implement with its
//! own read/replace/invalidate primitives, and which [`crate::MemoryStore`]
//! implements for tests and tooling.

use std::collections::HashMap;

use riptide_proto::{Message, TypingEvent};

use crate::{CacheKey, EntityKind};

/// Shapes of derived state the cache can hold.
///
/// Closed union matching the key families: a `Messages` key always holds
/// `Messages`, and so on. Exhaustive matching keeps the pairing honest when
/// a family is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    /// Ordered message list, append-only from this subsystem's view.
    Messages(Vec<Message>),
    /// Whole-record typing state, last write wins.
    Typing(TypingEvent),
    /// User-to-online map, merged one user at a time.
    Presence(HashMap<String, bool>),
}

/// Seam to the surrounding cache library.
///
/// Three operations, keyed by [`CacheKey`]. Implementations decide storage
/// and failure semantics through the associated `Error`; the reducer only
/// propagates errors, it cannot recover them (there is no event replay).
pub trait CacheStore {
    /// Store-level failure type.
    type Error: std::error::Error + Send + 'static;

    /// Current value under `key`, if any.
    fn read(&self, key: &CacheKey) -> Result<Option<CacheValue>, Self::Error>;

    /// Atomic read-modify-write of the slot under `key`.
    ///
    /// The updater observes the current value and mutates the slot in
    /// place; leaving the slot untouched expresses a no-op. No concurrent
    /// writer may observe a torn intermediate state for the same key, and
    /// the call must be synchronous and non-blocking from the reducer's
    /// perspective.
    fn write<F>(&self, key: CacheKey, update: F) -> Result<(), Self::Error>
    where
        F: FnOnce(&mut Option<CacheValue>);

    /// Mark every entry of a key family stale.
    ///
    /// Refetching is owned by whatever drives the underlying data-fetch
    /// pipeline; this subsystem only raises the flag.
    fn invalidate(&self, kind: EntityKind) -> Result<(), Self::Error>;
}
