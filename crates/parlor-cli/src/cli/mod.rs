//! CLI definition for the `parlor` binary.
//!
//! One positional argument -- the username to claim -- plus backend and
//! verbosity options. Uses clap derive macros.

pub mod chat;

use clap::Parser;

/// Chat from the terminal under an exclusively claimed username.
#[derive(Parser)]
#[command(name = "parlor", version, about, long_about = None)]
pub struct Cli {
    /// Username to claim for this session.
    pub username: String,

    /// Backend URL (overrides the config file).
    #[arg(long)]
    pub url: Option<String>,

    /// Suppress all output except errors.
    #[arg(long)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_required() {
        assert!(Cli::try_parse_from(["parlor"]).is_err());
    }

    #[test]
    fn test_parses_username() {
        let cli = Cli::try_parse_from(["parlor", "alice"]).unwrap();
        assert_eq!(cli.username, "alice");
        assert!(cli.url.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parses_url_and_verbosity() {
        let cli =
            Cli::try_parse_from(["parlor", "alice", "--url", "redis://host:6380", "-vv"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("redis://host:6380"));
        assert_eq!(cli.verbose, 2);
    }
}
