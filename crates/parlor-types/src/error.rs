use thiserror::Error;

/// Errors surfaced by a presence store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Connection(String),

    #[error("store command failed: {0}")]
    Command(String),
}

/// Errors from acquiring a presence claim.
#[derive(Debug, Error)]
pub enum PresenceError {
    /// Another live session holds this username. Expected contention,
    /// not a fault.
    #[error("user already online")]
    AlreadyOnline,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// The heartbeat write failed and the claim is forfeit.
///
/// Never retried: a silently expired claim would let another session take
/// the name while this one still believes it is active.
#[derive(Debug, Error)]
#[error("presence claim lost")]
pub struct ClaimLost;

/// Errors from roster operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The username was already in the shared roster set.
    #[error("user still in online roster")]
    AlreadyPresent,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Failures that terminate a session during the joining phase.
///
/// Everything after a successful join is handled inside the session loop;
/// these are the only errors that escape `SessionLoop::run`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("user '{0}' is already online")]
    AlreadyOnline(String),

    #[error("user '{0}' is still in the online roster")]
    AlreadyPresent(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_error_display() {
        assert_eq!(PresenceError::AlreadyOnline.to_string(), "user already online");
        assert_eq!(ClaimLost.to_string(), "presence claim lost");
    }

    #[test]
    fn test_store_error_wraps_into_presence_error() {
        let err: PresenceError = StoreError::Connection("refused".to_string()).into();
        assert_eq!(err.to_string(), "store error: store unreachable: refused");
    }

    #[test]
    fn test_roster_error_display() {
        assert_eq!(
            RosterError::AlreadyPresent.to_string(),
            "user still in online roster"
        );
    }

    #[test]
    fn test_session_error_display_names_user() {
        let err = SessionError::AlreadyOnline("alice".to_string());
        assert_eq!(err.to_string(), "user 'alice' is already online");
        let err = SessionError::AlreadyPresent("alice".to_string());
        assert_eq!(err.to_string(), "user 'alice' is still in the online roster");
    }
}
