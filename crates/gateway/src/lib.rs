//! Gateway: the WebSocket/HTTP front of the relay.
//!
//! Lifecycle:
//! 1. Load config, build the in-memory directory/store/channels and relay
//! 2. Bind the HTTP server (health, WebSocket upgrade, push delivery)
//! 3. Assign each upgraded socket a fresh connection id and register it
//! 4. Route inbound frames to ingress, socket close to disconnect
//! 5. Optionally run the echo responder against the fan-out channel
//!
//! All routing and failure-handling logic lives in `switchboard-relay`;
//! this crate only terminates transports and maps errors to HTTP.

pub mod push;
pub mod responder;
pub mod server;
pub mod state;
pub mod ws;
