//! Presence protocol and session loop for Parlor.
//!
//! This crate holds the protocol core: the `PresenceStore` trait the whole
//! client is written against, the TTL'd presence lock, the shared roster,
//! the topic-scoped chat bus, and the session loop that merges heartbeat,
//! inbound and input events. The Redis implementation of the store lives
//! in parlor-infra; an in-process `MemoryStore` lives here so every layer
//! is testable without a server.

pub mod bus;
pub mod presence;
pub mod session;
pub mod store;
