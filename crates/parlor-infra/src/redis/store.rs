//! Redis implementation of `PresenceStore`.
//!
//! Commands go through a `ConnectionManager` (auto-reconnecting, cheap to
//! clone per call). Subscriptions get a dedicated pub/sub connection,
//! since a subscribed Redis connection cannot issue regular commands.

use std::pin::Pin;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use parlor_core::store::{PresenceStore, Subscription};
use parlor_types::error::StoreError;
use redis::aio::ConnectionManager;
use tracing::{debug, warn};

/// Redis-backed implementation of `PresenceStore`.
pub struct RedisStore {
    client: redis::Client,
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to the backend at `url` (e.g. `redis://127.0.0.1:6379`).
    ///
    /// Fails fast if the server is unreachable; the session cannot
    /// guarantee exclusivity without it.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(store_err)?;
        let conn = client.get_connection_manager().await.map_err(store_err)?;
        debug!(url, "connected to backend");
        Ok(Self { client, conn })
    }
}

fn store_err(err: redis::RedisError) -> StoreError {
    if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StoreError::Connection(err.to_string())
    } else {
        StoreError::Command(err.to_string())
    }
}

impl PresenceStore for RedisStore {
    type Subscription = RedisSubscription;

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        // SET .. NX EX returns nil when the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(reply.is_some())
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _removed: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn set_add(&self, set_key: &str, member: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("SADD")
            .arg(set_key)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(store_err)
    }

    async fn set_remove(&self, set_key: &str, member: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _removed: i64 = redis::cmd("SREM")
            .arg(set_key)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn set_members(&self, set_key: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("SMEMBERS")
            .arg(set_key)
            .query_async(&mut conn)
            .await
            .map_err(store_err)
    }

    async fn publish(&self, topic: &str, payload: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _receivers: i64 = redis::cmd("PUBLISH")
            .arg(topic)
            .arg(payload)
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<Self::Subscription, StoreError> {
        let mut pubsub = self.client.get_async_pubsub().await.map_err(store_err)?;
        pubsub.subscribe(topic).await.map_err(store_err)?;
        Ok(RedisSubscription {
            stream: Box::pin(pubsub.into_on_message()),
        })
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

/// Live subscription over a dedicated pub/sub connection.
///
/// Dropping the handle drops the connection, which unsubscribes.
pub struct RedisSubscription {
    stream: Pin<Box<dyn Stream<Item = redis::Msg> + Send>>,
}

impl Subscription for RedisSubscription {
    async fn next_message(&mut self) -> Option<String> {
        loop {
            let msg = self.stream.next().await?;
            match msg.get_payload::<String>() {
                Ok(payload) => return Some(payload),
                Err(err) => {
                    warn!(error = %err, "dropping undecodable payload");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_rejects_malformed_url() {
        let result = RedisStore::connect("not a redis url").await;
        assert!(result.is_err());
    }
}
