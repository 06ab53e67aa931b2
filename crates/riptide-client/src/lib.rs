//! Connection lifecycle for the riptide chat stream.
//!
//! Owns the single live WebSocket matching the current [`Subscription`]
//! identity and wires its inbound frames through decode and apply. Protocol
//! semantics live in [`riptide_proto`] and [`riptide_core`]; this crate is
//! the thin layer that opens, drives, and tears down the transport.
//!
//! # Components
//!
//! - [`Subscription`]: the (token, conversation, origin) identity triple
//! - [`connect`] / [`ChatConnection`]: open the stream, stop it on every
//!   exit path
//! - [`SubscriptionManager`]: replace-on-identity-change policy
//! - [`Reconnector`]: explicit backoff wrapper layered around connect/stop
//!
//! # Concurrency
//!
//! One reader task per live connection; frames are dispatched one at a time
//! in delivery order, and nothing in the dispatch path suspends. Stopping
//! flips a gate checked before every dispatch, so no event fires into a
//! torn-down context.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod connection;
mod error;
mod manager;
mod reconnect;
mod subscription;

pub use connection::{ChatConnection, connect};
pub use error::SubscribeError;
pub use manager::SubscriptionManager;
pub use reconnect::{ReconnectPolicy, Reconnector};
pub use subscription::Subscription;
