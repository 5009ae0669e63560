//! # Navigation Commands
//!
//! Entry point for opening a view. The decision itself lives in
//! [`Navigator`](crate::navigation::Navigator); this layer adds the
//! store-variant check and parses route names typed on the command line.

use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::navigation::Navigation;
use crate::state::AppContext;
use storefront_core::Route;

/// Route names accepted by [`parse_route`].
pub const ROUTE_NAMES: &[&str] = &[
    "home",
    "catalog",
    "product",
    "cart",
    "chat",
    "escrow",
    "admin-products",
    "admin-categories",
    "admin-promo-codes",
    "admin-users",
];

/// Parses a route name, plus the product id for `product`.
pub fn parse_route(name: &str, id: Option<&str>) -> ApiResult<Route> {
    let route = match name.trim().to_ascii_lowercase().as_str() {
        "home" => Route::Home,
        "catalog" => Route::Catalog,
        "product" => {
            let id = id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| ApiError::validation("The product route needs a product id"))?;
            Route::Product(id.to_string())
        }
        "cart" => Route::Cart,
        "chat" => Route::Chat,
        "escrow" | "escrow-desk" => Route::EscrowDesk,
        "admin-products" => Route::AdminProducts,
        "admin-categories" => Route::AdminCategories,
        "admin-promo-codes" | "admin-promos" => Route::AdminPromoCodes,
        "admin-users" => Route::AdminUsers,
        other => {
            return Err(ApiError::validation(format!(
                "Unknown route '{}' (expected one of: {})",
                other,
                ROUTE_NAMES.join(", ")
            )))
        }
    };
    Ok(route)
}

/// Opens `route` for `user_id`.
///
/// ## Returns
/// * `Ok(Navigation)` - With the guard's decision, allowed or not
/// * `Err(NotFound)` - The escrow desk in a store without escrow
pub async fn open_route(ctx: &AppContext, user_id: Option<&str>, route: Route) -> ApiResult<Navigation> {
    if route == Route::EscrowDesk && !ctx.config.variant.has_escrow() {
        return Err(ApiError::not_found("Route", "escrow"));
    }
    debug!(?route, "open_route command");
    ctx.navigator.navigate(route, user_id).await
}
