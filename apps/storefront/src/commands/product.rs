//! # Product Commands
//!
//! Catalog reads for shoppers and product CRUD for admins.
//!
//! ## Catalog Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Reads                                        │
//! │                                                                         │
//! │  list_products(category?) ──► load("products", ...) ──┐                 │
//! │                               load("categories", ...) ─┤                │
//! │                                                        ▼                │
//! │                          LoadState<Vec<ProductView>>                    │
//! │                          (price after public discount,                  │
//! │                           category name if it still exists)             │
//! │                                                                         │
//! │  A failed category fetch only loses the names; a failed product fetch   │
//! │  yields Failed and the view shows its empty state.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::loader::load;
use crate::state::{AppContext, ConfigState};
use storefront_core::{effective_price, Category, LoadState, Money, Product, ProductForm, Route};

/// A product as the shop renders it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// Price after the public discount, if any.
    pub effective_price: Money,
    pub display_price: String,
    /// `None` for uncategorized products and for deleted categories.
    pub category_name: Option<String>,
}

impl ProductView {
    pub fn new(product: Product, categories: &[Category], config: &ConfigState) -> Self {
        let effective = effective_price(&product);
        ProductView {
            category_name: product.category_name(categories).map(str::to_string),
            effective_price: effective,
            display_price: config.format_currency(effective),
            product,
        }
    }
}

fn into_views(
    products: LoadState<Vec<Product>>,
    categories: &LoadState<Vec<Category>>,
    config: &ConfigState,
) -> LoadState<Vec<ProductView>> {
    let categories = categories.items_or_empty();
    products.map(|products| {
        products
            .into_iter()
            .map(|p| ProductView::new(p, categories, config))
            .collect()
    })
}

// =============================================================================
// Shopper Commands
// =============================================================================

/// Lists the catalog, optionally narrowed to one category. Newest first.
pub async fn list_products(ctx: &AppContext, category_id: Option<&str>) -> LoadState<Vec<ProductView>> {
    debug!(category_id = ?category_id, "list_products command");

    let products = match category_id {
        Some(id) => load("products by category", ctx.db.products().list_by_category(id)).await,
        None => load("products", ctx.db.products().list_all()).await,
    };
    let categories = load("categories", ctx.db.categories().list()).await;

    into_views(products, &categories, &ctx.config)
}

/// Name search across the catalog.
pub async fn search_products(ctx: &AppContext, term: &str, limit: Option<u32>) -> LoadState<Vec<ProductView>> {
    let limit = limit.unwrap_or(20).clamp(1, 100);
    debug!(term = %term, limit = %limit, "search_products command");

    let products = load("product search", ctx.db.products().search(term, limit)).await;
    let categories = load("categories", ctx.db.categories().list()).await;

    into_views(products, &categories, &ctx.config)
}

/// Gets a single product by its ID.
pub async fn get_product(ctx: &AppContext, id: &str) -> ApiResult<ProductView> {
    debug!(id = %id, "get_product command");

    let product = ctx
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    let category = match &product.category_id {
        Some(category_id) => ctx.db.categories().get_by_id(category_id).await?,
        None => None,
    };

    Ok(ProductView::new(product, category.as_slice(), &ctx.config))
}

// =============================================================================
// Admin Commands
// =============================================================================

/// A product may only be filed under a category that exists right now.
async fn ensure_category(ctx: &AppContext, form: &ProductForm) -> ApiResult<()> {
    let Some(id) = form.category_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(());
    };
    if ctx.db.categories().get_by_id(id).await?.is_none() {
        return Err(ApiError::validation(format!("Unknown category: {}", id)));
    }
    Ok(())
}

/// Creates a product from the admin form.
///
/// ## Returns
/// * `Err(ValidationError)` with per-field messages - Form failed validation
/// * `Err(Unauthorized / Forbidden)` - Caller is not an admin
pub async fn create_product(ctx: &AppContext, user_id: Option<&str>, form: ProductForm) -> ApiResult<Product> {
    let admin = ctx.navigator.require(Route::AdminProducts, user_id).await?;

    form.validate()?;
    ensure_category(ctx, &form).await?;

    let product = ctx.db.products().insert(&form.into_product()?).await?;
    info!(id = %product.id, by = %admin.user_id, "Product created");
    Ok(product)
}

/// Replaces a product's editable fields with the form's.
pub async fn update_product(
    ctx: &AppContext,
    user_id: Option<&str>,
    id: &str,
    form: ProductForm,
) -> ApiResult<Product> {
    let admin = ctx.navigator.require(Route::AdminProducts, user_id).await?;

    let mut product = ctx
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    form.validate()?;
    ensure_category(ctx, &form).await?;
    form.apply_to(&mut product)?;

    ctx.db.products().update(&product).await?;
    info!(id = %product.id, by = %admin.user_id, "Product updated");
    Ok(product)
}

pub async fn delete_product(ctx: &AppContext, user_id: Option<&str>, id: &str) -> ApiResult<()> {
    let admin = ctx.navigator.require(Route::AdminProducts, user_id).await?;
    ctx.db.products().delete(id).await?;
    info!(id = %id, by = %admin.user_id, "Product deleted");
    Ok(())
}
