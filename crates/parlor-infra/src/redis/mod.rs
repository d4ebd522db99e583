//! Redis-backed presence store.

pub mod store;

pub use store::{RedisStore, RedisSubscription};
