//! Session banner.
//!
//! Printed once before the prompt takes over the terminal.

use console::style;

/// Print the session banner: claimed name, backend, presence timing.
pub fn print_session_banner(username: &str, url: &str, ttl_secs: u64, heartbeat_secs: u64) {
    println!();
    println!("  {}", style(username).cyan().bold());
    println!("  {} {}", style("Backend:").bold(), style(url).dim());
    println!(
        "  {} {ttl_secs}s, refreshed every {heartbeat_secs}s",
        style("Presence TTL:").bold()
    );
    println!();
    println!(
        "  {}",
        style("/who lists who is online, /exit leaves, Ctrl+D also leaves").dim()
    );
    println!();
}
