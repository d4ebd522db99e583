//! In-process presence store.
//!
//! Backs the `PresenceStore` trait with process-local state: DashMap for
//! keys and sets, `tokio::sync::broadcast` for topic fan-out. Key expiry
//! is lazy -- an expired entry counts as absent the next time it is read.
//! Timers use `tokio::time::Instant`, so tests running under a paused
//! clock can drive TTL expiry with `tokio::time::advance`.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parlor_types::error::StoreError;
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::{PresenceStore, Subscription};

/// Buffer size for per-topic broadcast channels.
const TOPIC_BUFFER: usize = 1024;

struct KeyEntry {
    value: String,
    expires_at: Instant,
}

impl KeyEntry {
    fn live(&self) -> bool {
        self.expires_at > Instant::now()
    }
}

/// In-process implementation of `PresenceStore`.
///
/// Cloning shares the underlying state, so every clone sees the same
/// keys, sets and topics -- the in-memory analogue of separate
/// connections to one server.
#[derive(Clone, Default)]
pub struct MemoryStore {
    keys: Arc<DashMap<String, KeyEntry>>,
    sets: Arc<DashMap<String, BTreeSet<String>>>,
    topics: Arc<DashMap<String, broadcast::Sender<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a key currently holds a live (unexpired) value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The live value under a key, if any. Expired entries count as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        self.keys
            .get(key)
            .filter(|entry| entry.live())
            .map(|entry| entry.value.clone())
    }
}

impl PresenceStore for MemoryStore {
    type Subscription = MemorySubscription;

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let entry = KeyEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        // The DashMap entry guard makes the check-and-insert atomic.
        match self.keys.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().live() {
                    return Ok(false);
                }
                occupied.insert(entry);
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(true)
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.keys.insert(
            key.to_string(),
            KeyEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.keys.remove(key);
        Ok(())
    }

    async fn set_add(&self, set_key: &str, member: &str) -> Result<u64, StoreError> {
        let mut set = self.sets.entry(set_key.to_string()).or_default();
        Ok(u64::from(set.insert(member.to_string())))
    }

    async fn set_remove(&self, set_key: &str, member: &str) -> Result<(), StoreError> {
        if let Some(mut set) = self.sets.get_mut(set_key) {
            set.remove(member);
        }
        Ok(())
    }

    async fn set_members(&self, set_key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .sets
            .get(set_key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn publish(&self, topic: &str, payload: &str) -> Result<(), StoreError> {
        if let Some(sender) = self.topics.get(topic) {
            // No subscribers is fine; the payload is dropped.
            let _ = sender.send(payload.to_string());
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<Self::Subscription, StoreError> {
        let receiver = self
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_BUFFER).0)
            .subscribe();
        Ok(MemorySubscription { receiver })
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("keys", &self.keys.len())
            .field("sets", &self.sets.len())
            .field("topics", &self.topics.len())
            .finish()
    }
}

/// Subscription handle over a broadcast receiver.
pub struct MemorySubscription {
    receiver: broadcast::Receiver<String>,
}

impl Subscription for MemorySubscription {
    async fn next_message(&mut self) -> Option<String> {
        loop {
            match self.receiver.recv().await {
                Ok(payload) => return Some(payload),
                // A lagged receiver skips to the oldest retained message.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
