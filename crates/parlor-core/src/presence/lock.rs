//! TTL'd exclusive claim on a username.
//!
//! The lock is a store key `"online.<name>"` written with set-if-absent.
//! Liveness is self-healing: a crashed session's claim expires on its own
//! once the TTL elapses, so no claim can outlive its session forever.

use std::sync::Arc;
use std::time::Duration;

use parlor_types::error::{ClaimLost, PresenceError};
use parlor_types::user::Username;
use tracing::{debug, warn};

use crate::store::PresenceStore;

/// Prefix of presence lock keys.
pub const PRESENCE_KEY_PREFIX: &str = "online.";

/// Store key holding a user's presence claim.
pub fn presence_key(user: &Username) -> String {
    format!("{PRESENCE_KEY_PREFIX}{user}")
}

/// One session's exclusive, time-limited hold on a username.
///
/// At most one live claim exists per username; a claim is live until its
/// TTL elapses since the last refresh.
pub struct PresenceLock<S> {
    store: Arc<S>,
    username: Username,
    ttl: Duration,
}

impl<S: PresenceStore> PresenceLock<S> {
    /// Claim the username, failing if another live claim exists.
    ///
    /// `AlreadyOnline` is an expected contention outcome, not a fault.
    pub async fn acquire(
        store: Arc<S>,
        username: Username,
        ttl: Duration,
    ) -> Result<Self, PresenceError> {
        let key = presence_key(&username);
        let created = store.set_if_absent(&key, username.as_str(), ttl).await?;
        if !created {
            return Err(PresenceError::AlreadyOnline);
        }
        debug!(user = %username, ttl_secs = ttl.as_secs(), "presence claim acquired");
        Ok(Self {
            store,
            username,
            ttl,
        })
    }

    /// Re-arm the claim's TTL.
    ///
    /// The lock is already held, so an unconditional set is sufficient.
    /// Any failure is `ClaimLost` and must end the session -- once a
    /// refresh is missed the claim cannot be trusted again.
    pub async fn refresh(&self) -> Result<(), ClaimLost> {
        let key = presence_key(&self.username);
        match self.store.set(&key, self.username.as_str(), self.ttl).await {
            Ok(true) => {
                debug!(user = %self.username, "presence claim refreshed");
                Ok(())
            }
            Ok(false) => Err(ClaimLost),
            Err(err) => {
                warn!(user = %self.username, error = %err, "presence refresh failed");
                Err(ClaimLost)
            }
        }
    }

    /// Delete the claim.
    ///
    /// Best-effort: on failure the TTL reclaims the slot anyway.
    pub async fn release(self) {
        let key = presence_key(&self.username);
        if let Err(err) = self.store.delete(&key).await {
            warn!(user = %self.username, error = %err, "failed to release presence claim");
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    const TTL: Duration = Duration::from_secs(60);

    fn alice() -> Username {
        Username::new("alice").unwrap()
    }

    #[tokio::test]
    async fn acquire_claims_free_name() {
        let store = Arc::new(MemoryStore::new());
        let lock = PresenceLock::acquire(Arc::clone(&store), alice(), TTL)
            .await
            .unwrap();
        assert_eq!(lock.username().as_str(), "alice");
        assert_eq!(store.get("online.alice").as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn acquire_rejects_held_name() {
        let store = Arc::new(MemoryStore::new());
        let _held = PresenceLock::acquire(Arc::clone(&store), alice(), TTL)
            .await
            .unwrap();

        let second = PresenceLock::acquire(Arc::clone(&store), alice(), TTL).await;
        assert!(matches!(second, Err(PresenceError::AlreadyOnline)));
    }

    #[tokio::test]
    async fn concurrent_acquires_admit_exactly_one() {
        let store = Arc::new(MemoryStore::new());
        let (a, b) = tokio::join!(
            PresenceLock::acquire(Arc::clone(&store), alice(), TTL),
            PresenceLock::acquire(Arc::clone(&store), alice(), TTL),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unrefreshed_claim_self_heals() {
        let store = Arc::new(MemoryStore::new());
        let _abandoned = PresenceLock::acquire(Arc::clone(&store), alice(), TTL)
            .await
            .unwrap();

        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        PresenceLock::acquire(Arc::clone(&store), alice(), TTL)
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_extends_the_claim() {
        let store = Arc::new(MemoryStore::new());
        let lock = PresenceLock::acquire(Arc::clone(&store), alice(), TTL)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(45)).await;
        lock.refresh().await.unwrap();

        // Past the original deadline, still inside the refreshed one.
        tokio::time::advance(Duration::from_secs(45)).await;
        let steal = PresenceLock::acquire(Arc::clone(&store), alice(), TTL).await;
        assert!(matches!(steal, Err(PresenceError::AlreadyOnline)));
    }

    #[tokio::test]
    async fn release_frees_the_name_immediately() {
        let store = Arc::new(MemoryStore::new());
        let lock = PresenceLock::acquire(Arc::clone(&store), alice(), TTL)
            .await
            .unwrap();
        lock.release().await;

        assert!(!store.contains_key("online.alice"));
        PresenceLock::acquire(Arc::clone(&store), alice(), TTL)
            .await
            .unwrap();
    }
}
