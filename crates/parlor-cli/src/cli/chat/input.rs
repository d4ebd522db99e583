//! Async readline input for the session.
//!
//! Wraps `rustyline_async::Readline` so the rest of the client only sees
//! two things: completed lines and the end of input.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// What the input source produced.
#[derive(Debug)]
pub enum InputSignal {
    /// A completed line, exactly as typed (no trailing newline).
    Line(String),
    /// Input is over: Ctrl+D, Ctrl+C, or a read failure.
    Closed,
}

/// Async input handler owning the readline state.
pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create the input handler with the given prompt.
    ///
    /// Also returns the `SharedWriter` used to print inbound messages
    /// without tearing the prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, writer) = Readline::new(prompt)?;
        Ok((Self { rl }, writer))
    }

    /// Read one line of input.
    ///
    /// Every way the stream can end -- Ctrl+D, Ctrl+C, a read error --
    /// collapses into `Closed`. The session treats that as an implicit
    /// exit, so presence cleanup runs no matter how input stopped.
    pub async fn read_line(&mut self) -> InputSignal {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                self.rl.add_history_entry(line.clone());
                InputSignal::Line(line)
            }
            Ok(ReadlineEvent::Eof | ReadlineEvent::Interrupted) => InputSignal::Closed,
            Err(_) => InputSignal::Closed,
        }
    }
}
