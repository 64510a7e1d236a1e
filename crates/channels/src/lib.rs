//! Fan-out and push channels.
//!
//! The fan-out channel broadcasts newly sent user messages to an arbitrary
//! pool of responder subscribers. The push channel delivers a single
//! message to one live connection and reports `Gone` when the target
//! session no longer exists.

pub mod fanout;
pub mod push;

pub use {
    fanout::{BroadcastFanout, FanoutChannel, FanoutSubscriber, TaggedEvent},
    push::{PushChannel, PushError},
};
