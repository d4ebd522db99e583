//! Shared roster of online usernames.
//!
//! The roster is the store set `"users"`. Entries are added after a
//! presence claim is won and removed on graceful leave only: lock expiry
//! does not touch the set, so a crashed session leaves its name behind
//! until the store is cleaned up out of band. Readers must treat the
//! roster as best-effort.

use std::sync::Arc;

use parlor_types::error::RosterError;
use parlor_types::user::Username;
use tracing::{debug, warn};

use crate::store::PresenceStore;

/// Store key of the shared roster set.
pub const ROSTER_KEY: &str = "users";

/// The shared set of usernames currently considered online.
pub struct Roster<S> {
    store: Arc<S>,
}

impl<S: PresenceStore> Roster<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Add a username to the roster.
    ///
    /// The add is idempotent at the store level; a zero newly-added count
    /// maps to `AlreadyPresent`. The presence lock upstream already rules
    /// out two live sessions with one name, so this is a defensive check.
    pub async fn join(&self, user: &Username) -> Result<(), RosterError> {
        let added = self.store.set_add(ROSTER_KEY, user.as_str()).await?;
        if added == 0 {
            return Err(RosterError::AlreadyPresent);
        }
        debug!(user = %user, "joined roster");
        Ok(())
    }

    /// Remove a username from the roster. Best-effort, non-fatal.
    pub async fn leave(&self, user: &Username) {
        if let Err(err) = self.store.set_remove(ROSTER_KEY, user.as_str()).await {
            warn!(user = %user, error = %err, "failed to remove roster entry");
        }
    }

    /// Snapshot of the roster. No ordering promise beyond "some order".
    pub async fn list(&self) -> Result<Vec<String>, RosterError> {
        Ok(self.store.set_members(ROSTER_KEY).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn alice() -> Username {
        Username::new("alice").unwrap()
    }

    #[tokio::test]
    async fn join_then_list_contains_name_once() {
        let store = Arc::new(MemoryStore::new());
        let roster = Roster::new(store);

        roster.join(&alice()).await.unwrap();
        assert_eq!(roster.list().await.unwrap(), vec!["alice"]);
    }

    #[tokio::test]
    async fn repeated_join_reports_already_present_without_duplicates() {
        let store = Arc::new(MemoryStore::new());
        let roster = Roster::new(store);

        roster.join(&alice()).await.unwrap();
        let second = roster.join(&alice()).await;
        assert!(matches!(second, Err(RosterError::AlreadyPresent)));
        let third = roster.join(&alice()).await;
        assert!(matches!(third, Err(RosterError::AlreadyPresent)));

        assert_eq!(roster.list().await.unwrap(), vec!["alice"]);
    }

    #[tokio::test]
    async fn leave_removes_the_entry() {
        let store = Arc::new(MemoryStore::new());
        let roster = Roster::new(store);

        roster.join(&alice()).await.unwrap();
        roster.leave(&alice()).await;
        assert!(roster.list().await.unwrap().is_empty());

        // Leaving again is harmless.
        roster.leave(&alice()).await;
    }

    #[tokio::test]
    async fn list_empty_roster() {
        let store = Arc::new(MemoryStore::new());
        let roster = Roster::new(store);
        assert!(roster.list().await.unwrap().is_empty());
    }
}
