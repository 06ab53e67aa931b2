//! Wire protocol for the riptide chat stream.
//!
//! The server delivers events as JSON text frames over a single persistent
//! socket, each frame carrying a `type` discriminant and a `payload` object.
//! This crate defines the typed event model and the decoder that turns one
//! frame into one event, or into a recoverable [`DecodeError`] that the
//! caller drops without tearing down the stream.
//!
//! # Components
//!
//! - [`ServerEvent`]: closed set of events the server can deliver
//! - [`decode`]: one text frame to one typed event
//! - [`DecodeError`]: why a frame was rejected

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod decode;
mod error;
mod event;

pub use decode::decode;
pub use error::DecodeError;
pub use event::{ErrorEvent, Message, MessagePatch, PresenceEvent, ServerEvent, TypingEvent};
