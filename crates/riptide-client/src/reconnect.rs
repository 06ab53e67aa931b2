//! Explicit reconnect wrapper.
//!
//! The base [`connect`](crate::connect) contract does not retry: a dropped
//! stream simply stops delivering events. Resilience lives here, layered
//! around connect/stop, never inside the decoder or the reducer.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use riptide_core::CacheStore;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{Subscription, connection};

/// Backoff schedule for reopening a dropped stream.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for the doubling delay.
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { initial_delay: Duration::from_secs(1), max_delay: Duration::from_secs(30) }
    }
}

impl ReconnectPolicy {
    /// Next delay after `current`, doubled and capped.
    fn next_delay(self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_delay)
    }
}

/// Supervised connection that reopens the stream whenever it ends.
///
/// Same teardown contract as [`ChatConnection`](crate::ChatConnection):
/// [`stop`](Self::stop) is idempotent, dropping the handle stops the
/// supervision, and no event is dispatched after either.
#[derive(Debug)]
pub struct Reconnector {
    stopped: Arc<AtomicBool>,
    abort: tokio::task::AbortHandle,
}

impl Reconnector {
    /// Keep `subscription` connected, backing off per `policy` whenever
    /// the stream ends or an attempt fails.
    pub fn spawn<C>(subscription: Subscription, cache: C, policy: ReconnectPolicy) -> Self
    where
        C: CacheStore + Send + Sync + 'static,
    {
        let stopped = Arc::new(AtomicBool::new(false));
        let gate = Arc::clone(&stopped);
        let task = tokio::spawn(async move {
            supervise(&subscription, cache, policy, &gate).await;
        });
        Self { stopped, abort: task.abort_handle() }
    }

    /// Stop retrying and tear down the live stream.
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            info!("reconnect supervision stopped");
        }
        self.abort.abort();
    }

    /// Whether supervision has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Drop for Reconnector {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Connect, drive, back off, repeat until stopped.
async fn supervise<C>(
    subscription: &Subscription,
    cache: C,
    policy: ReconnectPolicy,
    stopped: &AtomicBool,
) where
    C: CacheStore + Send + Sync + 'static,
{
    let mut delay = policy.initial_delay;

    while !stopped.load(Ordering::SeqCst) {
        match connection::open_stream(subscription).await {
            Ok(stream) => {
                // A healthy connection resets the backoff schedule.
                delay = policy.initial_delay;
                connection::read_loop(stream, &cache, stopped).await;
            },
            Err(e) => {
                warn!(error = %e, "reconnect attempt failed");
            },
        }

        if stopped.load(Ordering::SeqCst) {
            break;
        }
        info!(?delay, "reopening chat stream");
        sleep(delay).await;
        delay = policy.next_delay(delay);
    }
}
