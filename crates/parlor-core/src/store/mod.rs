//! Presence store trait.
//!
//! Defines the narrow interface the client needs from the shared
//! key-value/pub-sub backend: TTL'd keys with an atomic set-if-absent, an
//! unordered set, and topic fan-out. Uses RPITIT (native async fn in
//! traits, Rust 2024 edition). The Redis implementation lives in
//! parlor-infra; `memory::MemoryStore` is the in-process implementation.

pub mod memory;

use std::time::Duration;

use parlor_types::error::StoreError;

/// A live subscription to one topic.
///
/// Single-use: consuming the messages is the only operation, and dropping
/// the subscription tears it down.
pub trait Subscription: Send + 'static {
    /// Receive the next payload, in delivery order.
    ///
    /// Blocks the calling task until a message arrives; returns `None`
    /// once the subscription is torn down. Run this on its own task so
    /// the blocking receive never stalls a select loop.
    fn next_message(&mut self) -> impl std::future::Future<Output = Option<String>> + Send;
}

/// Trait for the shared presence backend.
///
/// Cross-session coordination is delegated entirely to the atomicity of
/// `set_if_absent`; callers never add locking of their own.
pub trait PresenceStore: Send + Sync + 'static {
    type Subscription: Subscription;

    /// Atomically create a key only if it is absent, with the given TTL.
    /// Returns `true` iff the key was absent and is now set.
    fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    /// Set a key unconditionally with the given TTL. Returns `true` iff
    /// the write was acknowledged.
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    /// Delete a key. Idempotent; no error on a missing key.
    fn delete(&self, key: &str) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Add a member to a set. Returns the count of newly added members
    /// (0 or 1); 0 means the member was already present.
    fn set_add(
        &self,
        set_key: &str,
        member: &str,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Remove a member from a set. No-op if absent.
    fn set_remove(
        &self,
        set_key: &str,
        member: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Snapshot of a set's members. No ordering promise beyond "some order".
    fn set_members(
        &self,
        set_key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Publish a payload to all current subscribers of a topic.
    fn publish(
        &self,
        topic: &str,
        payload: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Open a subscription to a topic.
    fn subscribe(
        &self,
        topic: &str,
    ) -> impl std::future::Future<Output = Result<Self::Subscription, StoreError>> + Send;
}
