//! # Category Commands

use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::loader::load;
use crate::state::AppContext;
use storefront_core::{Category, CategoryForm, LoadState, Route};

/// Lists every category (shop navigation and admin screen).
pub async fn list_categories(ctx: &AppContext) -> LoadState<Vec<Category>> {
    debug!("list_categories command");
    load("categories", ctx.db.categories().list()).await
}

pub async fn get_category(ctx: &AppContext, id: &str) -> ApiResult<Category> {
    ctx.db
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", id))
}

pub async fn create_category(ctx: &AppContext, user_id: Option<&str>, form: CategoryForm) -> ApiResult<Category> {
    let admin = ctx.navigator.require(Route::AdminCategories, user_id).await?;

    let category = ctx.db.categories().insert(&form.into_category()?).await?;
    info!(id = %category.id, by = %admin.user_id, "Category created");
    Ok(category)
}

pub async fn rename_category(
    ctx: &AppContext,
    user_id: Option<&str>,
    id: &str,
    form: CategoryForm,
) -> ApiResult<Category> {
    let admin = ctx.navigator.require(Route::AdminCategories, user_id).await?;

    let mut category = get_category(ctx, id).await?;
    form.apply_to(&mut category)?;
    ctx.db.categories().update(&category).await?;

    info!(id = %id, by = %admin.user_id, "Category renamed");
    Ok(category)
}

/// Deletes a category. Its products stay, pointing at an id that no longer
/// resolves to a name.
pub async fn delete_category(ctx: &AppContext, user_id: Option<&str>, id: &str) -> ApiResult<()> {
    let admin = ctx.navigator.require(Route::AdminCategories, user_id).await?;
    ctx.db.categories().delete(id).await?;
    info!(id = %id, by = %admin.user_id, "Category deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::ConfigState;
    use storefront_core::UserProfile;

    #[tokio::test]
    async fn test_category_admin_flow() {
        let ctx = AppContext::in_memory(ConfigState::default()).await.unwrap();
        let mut admin = UserProfile::new("admin@shop.dev", "Admin");
        admin.is_admin = true;
        ctx.db.users().insert(&admin).await.unwrap();
        let admin = Some(admin.id.as_str());

        let created = create_category(&ctx, admin, CategoryForm { name: " Games ".into() })
            .await
            .unwrap();
        assert_eq!(created.name, "Games");

        let renamed = rename_category(&ctx, admin, &created.id, CategoryForm { name: "Keys".into() })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Keys");
        assert_eq!(list_categories(&ctx).await.items_or_empty().len(), 1);

        let err = create_category(&ctx, admin, CategoryForm { name: "  ".into() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        delete_category(&ctx, admin, &created.id).await.unwrap();
        assert_eq!(get_category(&ctx, &created.id).await.unwrap_err().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_anonymous_cannot_create() {
        let ctx = AppContext::in_memory(ConfigState::default()).await.unwrap();
        let err = create_category(&ctx, None, CategoryForm { name: "Games".into() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
