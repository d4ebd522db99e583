//! Session wiring.
//!
//! Connects to the backend, starts the readline task, and hands both to
//! the session loop. The loop owns the protocol; this module owns the
//! terminal niceties around it.

use std::sync::Arc;

use anyhow::Context;
use parlor_core::session::{InputEvent, SessionLoop, SessionOutcome};
use parlor_infra::config::{default_config_path, load_client_config, resolve_url};
use parlor_infra::redis::RedisStore;
use parlor_types::config::ClientConfig;
use parlor_types::user::Username;
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::Cli;

use super::banner::print_session_banner;
use super::input::{ChatInput, InputSignal};

/// Buffer for input events between the readline task and the session.
const INPUT_BUFFER: usize = 64;

/// Run one chat session to completion.
///
/// Errors out of here are joining-phase failures; the caller maps them to
/// exit status 1.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let username = Username::new(cli.username)?;

    let config = match default_config_path() {
        Some(path) => load_client_config(&path).await,
        None => ClientConfig::default(),
    };
    let url = resolve_url(&config, cli.url);

    let store = RedisStore::connect(&url)
        .await
        .with_context(|| format!("cannot reach backend at {url}"))?;
    let store = Arc::new(store);

    if !cli.quiet {
        print_session_banner(
            username.as_str(),
            &url,
            config.presence_ttl_secs,
            config.heartbeat_secs,
        );
    }

    let prompt = format!("{username}> ");
    let (input, writer) =
        ChatInput::new(prompt).map_err(|err| anyhow::anyhow!("failed to initialize input: {err}"))?;
    let (input_rx, input_task) = spawn_input_task(input);

    let session = SessionLoop::new(
        store,
        username,
        config.presence_ttl(),
        config.heartbeat(),
        input_rx,
        writer,
    );
    let outcome = session.run().await;

    // Dropping the readline restores the terminal; the task owns it, so
    // stop the task before printing the closing note.
    input_task.abort();
    let outcome = outcome?;

    let note = match outcome {
        SessionOutcome::Graceful => "Session ended.",
        SessionOutcome::ClaimLost | SessionOutcome::Disconnected => "Session closed.",
    };
    println!("\n{}", console::style(note).dim());
    Ok(())
}

/// Run the blocking readline on its own task, forwarding each completed
/// line (or the end-of-input signal) into the session's channel.
fn spawn_input_task(
    mut input: ChatInput,
) -> (mpsc::Receiver<InputEvent>, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    let task = tokio::spawn(async move {
        loop {
            let event = match input.read_line().await {
                InputSignal::Line(line) => InputEvent::Line(line),
                InputSignal::Closed => InputEvent::Closed,
            };
            let closed = matches!(event, InputEvent::Closed);
            if tx.send(event).await.is_err() {
                debug!("session gone, stopping input task");
                return;
            }
            if closed {
                return;
            }
        }
    });
    (rx, task)
}
