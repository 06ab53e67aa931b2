//! Riptide CLI entry point.
//!
//! Opens a supervised chat stream against an in-memory cache and logs the
//! event flow until interrupted. Meant for watching a server's broadcast
//! behavior, not for end users; set `RUST_LOG=riptide_core=debug` to see
//! every applied event.

use std::time::Duration;

use clap::Parser;
use riptide_client::{ReconnectPolicy, Reconnector, Subscription};
use riptide_core::{EntityKind, MemoryStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Watch a riptide chat stream.
#[derive(Parser, Debug)]
#[command(name = "riptide")]
#[command(about = "Follow a chat event stream into a local cache")]
#[command(version)]
struct Args {
    /// Server origin, e.g. `https://chat.example.com`
    #[arg(long)]
    base_url: String,

    /// Access token for the stream
    #[arg(long)]
    token: String,

    /// Narrow the stream to a single conversation
    #[arg(long)]
    conversation: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut subscription = Subscription::new(args.base_url, args.token);
    if let Some(conversation) = args.conversation {
        subscription = subscription.with_conversation(conversation);
    }

    let store = MemoryStore::new();
    let supervisor =
        Reconnector::spawn(subscription, store.clone(), ReconnectPolicy::default());

    let mut ticker = tokio::time::interval(Duration::from_secs(5));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                info!(
                    cached_entries = store.len(),
                    conversations_stale = store.is_stale(EntityKind::Conversations),
                    "cache summary"
                );
            },
        }
    }

    supervisor.stop();
    Ok(())
}
