//! # Storefront Entry Point
//!
//! Parses the command line and hands off to [`storefront_app::run`].
//!
//! ```text
//!   $ storefront products list
//!   $ storefront --user <id> cart add <product-id>
//!   $ storefront --user <admin-id> promo add SAVE10 --percent 10
//!   $ storefront --user <id> open admin-users
//! ```

use std::process::ExitCode;

use clap::Parser;
use storefront_app::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    storefront_app::run(Cli::parse()).await
}
