//! # Promo Code Commands
//!
//! Admin management of shopper-entered discount codes. Redemption itself is
//! [`cart_with_promo`](super::cart::cart_with_promo).

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;
use storefront_core::{PromoCode, PromoCodeForm, Route};

pub async fn list_promo_codes(ctx: &AppContext, user_id: Option<&str>) -> ApiResult<Vec<PromoCode>> {
    ctx.navigator.require(Route::AdminPromoCodes, user_id).await?;
    Ok(ctx.db.promo_codes().list().await?)
}

/// Creates a code from the admin form.
///
/// ## Returns
/// * `Err(ValidationError)` - Bad form, unknown target product, or the code exists
pub async fn create_promo_code(
    ctx: &AppContext,
    user_id: Option<&str>,
    form: PromoCodeForm,
) -> ApiResult<PromoCode> {
    let admin = ctx.navigator.require(Route::AdminPromoCodes, user_id).await?;

    let promo = form.into_promo_code()?;
    if let Some(product_id) = &promo.product_id {
        if ctx.db.products().get_by_id(product_id).await?.is_none() {
            return Err(ApiError::validation(format!("Unknown product: {}", product_id)));
        }
    }

    let promo = ctx.db.promo_codes().insert(&promo).await?;
    info!(code = %promo.code, by = %admin.user_id, "Promo code created");
    Ok(promo)
}

pub async fn set_promo_active(
    ctx: &AppContext,
    user_id: Option<&str>,
    id: &str,
    is_active: bool,
) -> ApiResult<PromoCode> {
    let admin = ctx.navigator.require(Route::AdminPromoCodes, user_id).await?;

    ctx.db.promo_codes().set_active(id, is_active).await?;
    info!(id = %id, is_active, by = %admin.user_id, "Promo code toggled");

    ctx.db
        .promo_codes()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Promo code", id))
}

pub async fn delete_promo_code(ctx: &AppContext, user_id: Option<&str>, id: &str) -> ApiResult<()> {
    let admin = ctx.navigator.require(Route::AdminPromoCodes, user_id).await?;
    ctx.db.promo_codes().delete(id).await?;
    info!(id = %id, by = %admin.user_id, "Promo code deleted");
    Ok(())
}
