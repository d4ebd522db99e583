//! The session loop: one user's chat session from join to teardown.
//!
//! A session owns one presence claim, one roster entry, one bus
//! subscription, a heartbeat timer and a local-input channel, and drives
//! the protocol as the state machine Joining -> Active -> Leaving ->
//! Terminated. All protocol decisions happen on one task; the inbound
//! subscription and the input reader run on their own tasks and feed the
//! merge point through ordered channels.

pub mod command;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use parlor_types::error::{PresenceError, RosterError, SessionError};
use parlor_types::message::{joined_announcement, left_announcement, ChatMessage};
use parlor_types::user::Username;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::bus::ChatBus;
use crate::presence::{PresenceLock, Roster};
use crate::store::{PresenceStore, Subscription};

use command::Command;

/// Events forwarded from the local input source.
#[derive(Debug)]
pub enum InputEvent {
    /// A completed line, as typed.
    Line(String),
    /// End of input: EOF, interrupt, or a read failure. An implicit exit.
    Closed,
}

/// How a completed session ended. Reaching any outcome means the Leaving
/// cleanup ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user asked to leave, or input ended.
    Graceful,
    /// A heartbeat refresh failed; the claim was forfeit and the session
    /// forced out.
    ClaimLost,
    /// The inbound subscription ended underneath the session.
    Disconnected,
}

/// One user's chat session.
///
/// Generic over the store and the output sink: the binary passes the
/// terminal writer, tests pass a buffer.
pub struct SessionLoop<S, W> {
    store: Arc<S>,
    username: Username,
    ttl: Duration,
    heartbeat: Duration,
    input: mpsc::Receiver<InputEvent>,
    out: W,
}

impl<S, W> SessionLoop<S, W>
where
    S: PresenceStore,
    W: Write + Send,
{
    pub fn new(
        store: Arc<S>,
        username: Username,
        ttl: Duration,
        heartbeat: Duration,
        input: mpsc::Receiver<InputEvent>,
        out: W,
    ) -> Self {
        Self {
            store,
            username,
            ttl,
            heartbeat,
            input,
            out,
        }
    }

    /// Run the session to completion: join, serve events, leave.
    ///
    /// Errors are join-phase only. Once Active, every failure is handled
    /// in the loop and expressed as a `SessionOutcome`.
    pub async fn run(mut self) -> Result<SessionOutcome, SessionError> {
        // -- Joining --
        let lock = match PresenceLock::acquire(
            Arc::clone(&self.store),
            self.username.clone(),
            self.ttl,
        )
        .await
        {
            Ok(lock) => lock,
            Err(PresenceError::AlreadyOnline) => {
                return Err(SessionError::AlreadyOnline(self.username.to_string()));
            }
            Err(PresenceError::Store(err)) => return Err(SessionError::Store(err)),
        };

        let roster = Roster::new(Arc::clone(&self.store));
        if let Err(err) = roster.join(&self.username).await {
            // The claim must not outlive a failed join.
            lock.release().await;
            return Err(match err {
                RosterError::AlreadyPresent => {
                    SessionError::AlreadyPresent(self.username.to_string())
                }
                RosterError::Store(err) => SessionError::Store(err),
            });
        }

        let bus = ChatBus::new(Arc::clone(&self.store));
        let subscription = match bus.subscribe().await {
            Ok(subscription) => subscription,
            Err(err) => {
                roster.leave(&self.username).await;
                lock.release().await;
                return Err(SessionError::Store(err));
            }
        };
        let mut inbound = spawn_inbound_forwarder(subscription);

        bus.publish(&joined_announcement(&self.username)).await;
        info!(user = %self.username, "joined chat");

        // -- Active --
        let outcome = self.serve(&lock, &roster, &bus, &mut inbound).await;

        // -- Leaving --
        // Roster first, then the claim, then the announcement; each step
        // is best-effort and never blocks the next.
        roster.leave(&self.username).await;
        lock.release().await;
        bus.publish(&left_announcement(&self.username)).await;
        info!(user = %self.username, outcome = ?outcome, "left chat");

        Ok(outcome)
    }

    /// The Active phase: merge heartbeat ticks, inbound payloads and
    /// input lines until something ends the session.
    async fn serve(
        &mut self,
        lock: &PresenceLock<S>,
        roster: &Roster<S>,
        bus: &ChatBus<S>,
        inbound: &mut mpsc::UnboundedReceiver<String>,
    ) -> SessionOutcome {
        // The claim was just written with a full TTL, so the first
        // refresh is due one whole interval from now.
        let first_tick = tokio::time::Instant::now() + self.heartbeat;
        let mut heartbeat = tokio::time::interval_at(first_tick, self.heartbeat);

        loop {
            // select! polls branches in random order, so no source can
            // starve the others. Each channel preserves its own arrival
            // order; a queued /exit is always reached.
            tokio::select! {
                payload = inbound.recv() => match payload {
                    Some(payload) => {
                        let _ = writeln!(self.out, "{payload}");
                        let _ = self.out.flush();
                    }
                    None => {
                        warn!(user = %self.username, "inbound subscription ended");
                        return SessionOutcome::Disconnected;
                    }
                },

                _ = heartbeat.tick() => {
                    if lock.refresh().await.is_err() {
                        let _ = writeln!(self.out, "heartbeat failed, connection lost");
                        let _ = self.out.flush();
                        return SessionOutcome::ClaimLost;
                    }
                }

                event = self.input.recv() => match event {
                    None | Some(InputEvent::Closed) => return SessionOutcome::Graceful,
                    Some(InputEvent::Line(line)) => match command::parse(&line) {
                        Some(Command::Exit) => return SessionOutcome::Graceful,
                        Some(Command::Who) => match roster.list().await {
                            Ok(names) => {
                                for name in names {
                                    let _ = writeln!(self.out, "{name}");
                                }
                                let _ = self.out.flush();
                            }
                            Err(err) => {
                                warn!(user = %self.username, error = %err, "roster listing failed");
                            }
                        },
                        None => {
                            bus.publish(&ChatMessage::new(&self.username, line).to_wire()).await;
                        }
                    },
                },
            }
        }
    }
}

/// Run the blocking subscription receive on its own task, forwarding each
/// payload into an ordered channel the select loop can poll.
///
/// The task ends when the subscription closes or the session drops the
/// receiving end, which in turn drops the subscription.
fn spawn_inbound_forwarder<T: Subscription>(mut subscription: T) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(payload) = subscription.next_message().await {
            if tx.send(payload).is_err() {
                debug!("session gone, dropping subscription");
                break;
            }
        }
    });
    rx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
