//! # Config Commands

use tracing::debug;

use crate::state::{AppContext, ConfigState};

/// Gets the current application configuration.
///
/// ## When Used
/// - Rendering headers (store name)
/// - Currency formatting
/// - Deciding whether to show the escrow desk
pub fn get_config(ctx: &AppContext) -> ConfigState {
    debug!("get_config command");
    ctx.config.clone()
}
