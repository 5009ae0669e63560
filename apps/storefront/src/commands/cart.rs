//! # Cart Commands
//!
//! Commands for cart manipulation and promo code previews.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────────┐                     │
//! │  │  Empty   │────►│ In Cart  │────►│ Promo preview│                     │
//! │  │  Cart    │     │          │     │ (read only)  │                     │
//! │  └──────────┘     └──────────┘     └──────────────┘                     │
//! │       ▲                │                                                │
//! │       │           add_to_cart                                          │
//! │       │           update_cart_item                                     │
//! │       │           remove_from_cart                                     │
//! │       │                │                                                │
//! │       └─────────── clear_cart                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every response is built from a fresh snapshot, so totals are always
//! derived from the lines being returned.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppContext, ConfigState};
use storefront_core::{promo_price, Cart, CartTotals, CoreError, Money, PromoCode};

/// One cart line as the cart view shows it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub thumbnail: Option<String>,
    pub quantity: u32,
    /// Base price of one unit.
    pub unit_price: Money,
    /// What one unit costs after any discount.
    pub effective_price: Money,
    pub line_total: Money,
}

/// Totals pre-formatted with the store's currency symbol.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTotals {
    pub subtotal: String,
    pub discount: String,
    pub total: String,
}

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
    pub display: DisplayTotals,
    /// Set when the totals include a promo code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

impl CartResponse {
    pub fn build(cart: &Cart, promo: Option<&PromoCode>, now: DateTime<Utc>, config: &ConfigState) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|item| {
                let effective = promo_price(&item.product, promo, now);
                CartLine {
                    product_id: item.product.id.clone(),
                    name: item.product.name.clone(),
                    thumbnail: item.product.thumbnail().map(str::to_string),
                    quantity: item.quantity,
                    unit_price: item.product.price,
                    effective_price: effective,
                    line_total: effective.multiply_quantity(item.quantity),
                }
            })
            .collect();

        let totals = match promo {
            Some(promo) => cart.totals_with_promo(promo, now),
            None => cart.totals(),
        };

        CartResponse {
            items,
            totals,
            display: DisplayTotals {
                subtotal: config.format_currency(totals.subtotal),
                discount: config.format_currency(totals.discount),
                total: config.format_currency(totals.total),
            },
            promo_code: promo.map(|p| p.code.clone()),
        }
    }

    fn plain(cart: &Cart, config: &ConfigState) -> Self {
        Self::build(cart, None, Utc::now(), config)
    }
}

/// Gets the current cart contents.
pub fn get_cart(ctx: &AppContext) -> CartResponse {
    debug!("get_cart command");
    CartResponse::plain(&ctx.cart.snapshot(), &ctx.config)
}

/// Adds one unit of a catalog product to the cart.
///
/// ## Behavior
/// - If product already in cart: quantity increases by one
/// - If product not in cart: added as a new line
/// - The line keeps the product as it was at this moment
///
/// ## Returns
/// * `Err(NotFound)` - No such product in the catalog
pub async fn add_to_cart(ctx: &AppContext, product_id: &str) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, "add_to_cart command");

    let product = ctx
        .db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    let cart = ctx.cart.add_to_cart(&product);
    Ok(CartResponse::plain(&cart, &ctx.config))
}

/// Sets the quantity of a line. Quantity 0 or below removes it.
pub fn update_cart_item(ctx: &AppContext, product_id: &str, quantity: i64) -> CartResponse {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");
    let cart = ctx.cart.update_quantity(product_id, quantity);
    CartResponse::plain(&cart, &ctx.config)
}

pub fn remove_from_cart(ctx: &AppContext, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");
    let cart = ctx.cart.remove_from_cart(product_id);
    CartResponse::plain(&cart, &ctx.config)
}

pub fn clear_cart(ctx: &AppContext) -> CartResponse {
    debug!("clear_cart command");
    let cart = ctx.cart.clear_cart();
    CartResponse::plain(&cart, &ctx.config)
}

/// Shows the cart priced with a shopper-entered promo code.
///
/// The cart itself is not changed. Lines that already carry a public
/// discount keep it; the code never stacks on top.
///
/// ## Returns
/// * `Err(NotFound)` - Unknown code
/// * `Err(BusinessLogic)` - Code switched off or expired
pub async fn cart_with_promo(ctx: &AppContext, code: &str) -> ApiResult<CartResponse> {
    debug!(code = %code, "cart_with_promo command");

    let promo = ctx
        .db
        .promo_codes()
        .get_by_code(code)
        .await?
        .ok_or_else(|| ApiError::not_found("Promo code", &PromoCode::normalize(code)))?;

    let now = Utc::now();
    promo.check(now)?;

    Ok(CartResponse::build(&ctx.cart.snapshot(), Some(&promo), now, &ctx.config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Duration;
    use storefront_core::{new_id, Product};

    async fn context() -> AppContext {
        AppContext::in_memory(ConfigState::default()).await.unwrap()
    }

    async fn stock(ctx: &AppContext, name: &str, cents: i64) -> Product {
        let product = Product::new(name, Money::from_cents(cents));
        ctx.db.products().insert(&product).await.unwrap()
    }

    async fn code(ctx: &AppContext, code: &str, pct: u8, expires_at: Option<DateTime<Utc>>) {
        let now = Utc::now();
        let promo = PromoCode {
            id: new_id(),
            code: code.to_string(),
            discount_percentage: pct,
            product_id: None,
            is_active: true,
            expires_at,
            created_at: now,
            updated_at: now,
        };
        ctx.db.promo_codes().insert(&promo).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_and_totals() {
        let ctx = context().await;
        let a = stock(&ctx, "A", 1000).await;
        let b = stock(&ctx, "B", 500).await;

        add_to_cart(&ctx, &a.id).await.unwrap();
        add_to_cart(&ctx, &a.id).await.unwrap();
        let response = add_to_cart(&ctx, &b.id).await.unwrap();

        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].quantity, 2);
        assert_eq!(response.items[0].line_total.cents(), 2000);
        assert_eq!(response.totals.total_items, 3);
        assert_eq!(response.display.total, "$25.00");
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let ctx = context().await;
        let err = add_to_cart(&ctx, "missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(get_cart(&ctx).items.is_empty());
    }

    #[tokio::test]
    async fn test_cart_keeps_snapshot_after_catalog_edit() {
        let ctx = context().await;
        let mut a = stock(&ctx, "A", 1000).await;
        add_to_cart(&ctx, &a.id).await.unwrap();

        a.price = Money::from_cents(9999);
        ctx.db.products().update(&a).await.unwrap();

        assert_eq!(get_cart(&ctx).totals.total.cents(), 1000);
    }

    #[tokio::test]
    async fn test_update_remove_clear() {
        let ctx = context().await;
        let a = stock(&ctx, "A", 1000).await;
        let b = stock(&ctx, "B", 500).await;
        add_to_cart(&ctx, &a.id).await.unwrap();
        add_to_cart(&ctx, &b.id).await.unwrap();

        assert_eq!(update_cart_item(&ctx, &a.id, 3).totals.total_items, 4);
        assert_eq!(update_cart_item(&ctx, &a.id, -1).items.len(), 1);
        assert_eq!(remove_from_cart(&ctx, &b.id).items.len(), 0);

        add_to_cart(&ctx, &a.id).await.unwrap();
        assert!(clear_cart(&ctx).items.is_empty());
    }

    #[tokio::test]
    async fn test_promo_preview_does_not_stack() {
        let ctx = context().await;
        let plain = stock(&ctx, "Plain", 1000).await;

        let mut public = Product::new("Public", Money::from_cents(1000));
        public.promo_active = true;
        public.has_public_discount = true;
        public.discount_percentage = Some(20);
        ctx.db.products().insert(&public).await.unwrap();

        add_to_cart(&ctx, &plain.id).await.unwrap();
        add_to_cart(&ctx, &public.id).await.unwrap();
        code(&ctx, "HALF", 50, None).await;

        let response = cart_with_promo(&ctx, " half ").await.unwrap();
        assert_eq!(response.promo_code.as_deref(), Some("HALF"));
        assert_eq!(response.items[0].effective_price.cents(), 500);
        assert_eq!(response.items[1].effective_price.cents(), 800);
        assert_eq!(response.totals.total.cents(), 1300);
        assert_eq!(response.display.discount, "$7.00");

        // The stored cart is untouched
        assert_eq!(get_cart(&ctx).totals.total.cents(), 1800);
    }

    #[tokio::test]
    async fn test_promo_rejections() {
        let ctx = context().await;
        code(&ctx, "GONE", 10, Some(Utc::now() - Duration::days(1))).await;

        let err = cart_with_promo(&ctx, "gone").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let err = cart_with_promo(&ctx, "nope").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Promo code not found: NOPE");
    }
}
