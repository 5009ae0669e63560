//! # Storefront Library
//!
//! Everything behind the `storefront` binary: the explicit application
//! context, the persisted cart store, the route guard and the commands.
//!
//! ## Module Organization
//! ```text
//! storefront_app/
//! ├── lib.rs          ◄─── You are here (logging setup & run)
//! ├── cli.rs          ◄─── clap definitions and dispatch
//! ├── state/
//! │   ├── mod.rs      ◄─── AppContext
//! │   ├── db.rs       ◄─── Database connection helpers
//! │   ├── cart.rs     ◄─── Persisted, observable cart store
//! │   ├── storage.rs  ◄─── Key/value slot the cart is saved in
//! │   └── config.rs   ◄─── Configuration state
//! ├── navigation.rs   ◄─── Route guard over the role lookup
//! ├── loader.rs       ◄─── Fetch → LoadState helper
//! ├── commands/       ◄─── Catalog, cart, admin, chat, navigation
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Output Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  success  ──► pretty JSON on stdout, exit code 0                        │
//! │  failure  ──► ApiError JSON on stdout, exit code 1                      │
//! │  logs     ──► stderr (RUST_LOG, default info)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod loader;
pub mod navigation;
pub mod state;

use std::process::ExitCode;

use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::ApiError;
use state::AppContext;

/// Runs one CLI invocation.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging (stderr, env filter)                             │
/// │  2. Build ConfigState (env vars, then flags)                            │
/// │  3. Open database, run migrations, rehydrate the cart slot              │
/// │  4. Dispatch the subcommand                                             │
/// │  5. Print the result, close the pool                                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> ExitCode {
    init_tracing();

    let config = cli.config();
    info!(variant = ?config.variant, store = %config.store_name, "Starting storefront");

    let ctx = match AppContext::open(config).await {
        Ok(ctx) => ctx,
        Err(err) => {
            error!(%err, "Startup failed");
            return print_error(&err);
        }
    };

    let result = cli::dispatch(&ctx, cli.user.as_deref(), cli.command).await;
    ctx.db.close().await;

    match result {
        Ok(value) => {
            print_json(&value);
            ExitCode::SUCCESS
        }
        Err(err) => print_error(&err),
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(err) => error!(%err, "Could not encode output"),
    }
}

fn print_error(err: &ApiError) -> ExitCode {
    print_json(err);
    ExitCode::FAILURE
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront=trace` - Show trace for storefront crates only
/// - Default: INFO level, DEBUG for storefront
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn"));

    // A second init (tests, embedding) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
