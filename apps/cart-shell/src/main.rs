//! # Bazaar Cart Shell
//!
//! Drives a cart session from stdin, one command per line.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          cart-shell                                     │
//! │                                                                         │
//! │  config.toml + env ──► SessionConfig                                    │
//! │                              │                                          │
//! │  cart.json ──(persist)──► CartSession ◄── Command ◄── stdin line       │
//! │      ▲                       │                                          │
//! │      └──(revision changed)───┘──► stdout                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so stdout stays scriptable. An unknown action tag in a
//! `json` envelope ends the shell with a non-zero exit status.
//!
//! ## Usage
//! ```text
//! cart-shell [config.toml]
//! RUST_LOG=bazaar=trace cart-shell
//! ```

mod commands;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use bazaar_session::{CartSession, SessionConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = SessionConfig::load_or_default(config_path);

    let snapshot_path = config.cart.persist.then(|| config.snapshot_path()).flatten();
    let session = match &snapshot_path {
        Some(path) => CartSession::restore(path),
        None => CartSession::new(),
    };
    info!(
        currency = %config.currency.code,
        persist = snapshot_path.is_some(),
        "Cart shell ready"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut saved_revision = session.revision();

    for line in stdin.lock().lines() {
        let line = line?;

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(stdout, "{}", e)?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        match command.execute(&session, &config) {
            Ok(output) => writeln!(stdout, "{}", output)?,
            Err(e) if e.is_fatal() => {
                error!(error = %e, "Unknown cart action, stopping");
                return Err(e.into());
            }
            Err(e) => {
                error!(error = %e, "Command failed");
                writeln!(stdout, "error: {}", e)?;
            }
        }

        if let Some(path) = &snapshot_path {
            let revision = session.revision();
            if revision != saved_revision {
                match session.save_snapshot(path) {
                    Ok(()) => saved_revision = revision,
                    Err(e) => warn!(?path, error = %e, "Failed to save cart snapshot"),
                }
            }
        }
    }

    info!(
        items = session.totals().item_count,
        "Cart shell exiting"
    );
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bazaar=trace` - Show trace for bazaar crates only
/// - Default: INFO, DEBUG for the cart crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bazaar=debug,cart_shell=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
