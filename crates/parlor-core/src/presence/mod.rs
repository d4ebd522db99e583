//! Presence protocol: the username lock and the shared roster.
//!
//! Mutual exclusion over usernames comes from `PresenceLock` (a TTL'd
//! conditional-set key); `Roster` is the shared set of names currently
//! considered online.

pub mod lock;
pub mod roster;

pub use lock::PresenceLock;
pub use roster::Roster;
