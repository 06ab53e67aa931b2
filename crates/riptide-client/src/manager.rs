//! Subscription replacement policy.

use riptide_core::CacheStore;
use tracing::debug;

use crate::{ChatConnection, SubscribeError, Subscription, connect};

/// Owns at most one live connection and swaps it when identity changes.
///
/// Consumer-facing entry point: hand it the current `{token,
/// conversation, origin}` triple whenever that changes and it keeps the
/// stream matching. Any change to the triple is a full replacement (stop
/// the old stream, open a new one); setting an identical subscription
/// leaves the live stream running. All effects are observed through the
/// cache, never returned.
///
/// Dropping the manager drops the connection handle, which stops the
/// stream; no explicit teardown call is required on exit paths.
#[derive(Debug)]
pub struct SubscriptionManager<C> {
    cache: C,
    active: Option<(Subscription, ChatConnection)>,
}

impl<C> SubscriptionManager<C>
where
    C: CacheStore + Clone + Send + Sync + 'static,
{
    /// Create a manager writing through `cache`.
    pub fn new(cache: C) -> Self {
        Self { cache, active: None }
    }

    /// Ensure the live connection matches `subscription`.
    ///
    /// An empty token means "not authenticated yet": any live stream is
    /// torn down and nothing is opened until a token arrives.
    ///
    /// # Errors
    ///
    /// Returns [`SubscribeError`] when a fresh connection is needed and
    /// cannot be established. The previous stream is already stopped by
    /// then; the manager holds no connection afterwards.
    pub async fn set(&mut self, subscription: Subscription) -> Result<(), SubscribeError> {
        if subscription.token().is_empty() {
            self.clear();
            return Ok(());
        }

        if let Some((current, connection)) = &self.active
            && *current == subscription
            && !connection.is_closed()
        {
            debug!("subscription identity unchanged");
            return Ok(());
        }

        self.clear();
        let connection = connect(&subscription, self.cache.clone()).await?;
        self.active = Some((subscription, connection));
        Ok(())
    }

    /// Tear down the live connection, if any.
    pub fn clear(&mut self) {
        if let Some((_, connection)) = self.active.take() {
            connection.stop();
        }
    }

    /// Identity of the live connection, if one is running.
    pub fn current(&self) -> Option<&Subscription> {
        self.active.as_ref().map(|(subscription, _)| subscription)
    }
}
