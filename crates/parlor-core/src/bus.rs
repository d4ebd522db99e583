//! Topic-scoped chat bus.
//!
//! Thin facade over the store's pub/sub channel, pinned to a single
//! topic. Publishing is fire-and-forget: chat delivery is best-effort,
//! so failures are logged and swallowed rather than escalated.

use std::sync::Arc;

use parlor_types::error::StoreError;
use tracing::warn;

use crate::store::PresenceStore;

/// Topic carrying all chat and system traffic.
pub const CHAT_TOPIC: &str = "messages";

/// Publish/subscribe handle scoped to one topic.
pub struct ChatBus<S> {
    store: Arc<S>,
    topic: String,
}

impl<S: PresenceStore> ChatBus<S> {
    /// Bus over the default chat topic.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_topic(store, CHAT_TOPIC)
    }

    pub fn with_topic(store: Arc<S>, topic: impl Into<String>) -> Self {
        Self {
            store,
            topic: topic.into(),
        }
    }

    /// Publish a payload. Fire-and-forget; a failed publish drops the
    /// message with a warning.
    pub async fn publish(&self, payload: &str) {
        if let Err(err) = self.store.publish(&self.topic, payload).await {
            warn!(topic = %self.topic, error = %err, "publish failed, message dropped");
        }
    }

    /// Open the inbound subscription. Single-use; consume it from a
    /// dedicated task so its blocking receive stalls nothing else.
    pub async fn subscribe(&self) -> Result<S::Subscription, StoreError> {
        self.store.subscribe(&self.topic).await
    }
}

impl<S> std::fmt::Debug for ChatBus<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatBus").field("topic", &self.topic).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::Subscription;

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let store = Arc::new(MemoryStore::new());
        let bus = ChatBus::new(Arc::clone(&store));

        let mut sub = bus.subscribe().await.unwrap();
        bus.publish("alice:hello").await;

        assert_eq!(sub.next_message().await.as_deref(), Some("alice:hello"));
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_error() {
        let store = Arc::new(MemoryStore::new());
        let bus = ChatBus::new(store);
        bus.publish("alice:hello").await;
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let store = Arc::new(MemoryStore::new());
        let chat = ChatBus::new(Arc::clone(&store));
        let other = ChatBus::with_topic(Arc::clone(&store), "announcements");

        let mut chat_sub = chat.subscribe().await.unwrap();
        other.publish("out of band").await;
        chat.publish("alice:hi").await;

        // The chat subscriber only ever sees chat traffic.
        assert_eq!(chat_sub.next_message().await.as_deref(), Some("alice:hi"));
    }

    #[test]
    fn debug_impl() {
        let bus = ChatBus::new(Arc::new(MemoryStore::new()));
        assert!(format!("{bus:?}").contains("messages"));
    }
}
