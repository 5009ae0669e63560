//! # User Commands
//!
//! Profiles and the admin / escrow-agent role flags.

use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;
use storefront_core::{Route, UserForm, UserProfile};

/// The signed-in user's own profile.
pub async fn current_user(ctx: &AppContext, user_id: Option<&str>) -> ApiResult<UserProfile> {
    let id = user_id.ok_or_else(ApiError::unauthorized)?;
    debug!(id = %id, "current_user command");

    ctx.db
        .users()
        .get_by_id(id)
        .await?
        .ok_or_else(ApiError::unauthorized)
}

pub async fn list_users(ctx: &AppContext, user_id: Option<&str>) -> ApiResult<Vec<UserProfile>> {
    ctx.navigator.require(Route::AdminUsers, user_id).await?;
    Ok(ctx.db.users().list().await?)
}

/// Registers a user from the admin form, role flags included.
pub async fn create_user(ctx: &AppContext, user_id: Option<&str>, form: UserForm) -> ApiResult<UserProfile> {
    let admin = ctx.navigator.require(Route::AdminUsers, user_id).await?;
    form.validate()?;

    let mut user = UserProfile::new(form.email.trim(), form.display_name.trim());
    user.is_admin = form.is_admin;
    user.is_escrow_agent = form.is_escrow_agent;

    let user = ctx.db.users().insert(&user).await?;
    info!(id = %user.id, by = %admin.user_id, "User created");
    Ok(user)
}

/// Lets the signed-in user change their own email and display name.
pub async fn update_profile(
    ctx: &AppContext,
    user_id: Option<&str>,
    email: Option<String>,
    display_name: Option<String>,
) -> ApiResult<UserProfile> {
    let mut user = current_user(ctx, user_id).await?;

    let form = UserForm {
        email: email.unwrap_or_else(|| user.email.clone()),
        display_name: display_name.unwrap_or_else(|| user.display_name.clone()),
        is_admin: user.is_admin,
        is_escrow_agent: user.is_escrow_agent,
    };
    form.validate()?;

    user.email = form.email.trim().to_string();
    user.display_name = form.display_name.trim().to_string();
    ctx.db.users().update_profile(&user).await?;

    info!(id = %user.id, "Profile updated");
    Ok(user)
}

/// Grants or revokes roles on another user.
///
/// An admin cannot drop their own admin flag, so the store always keeps
/// at least the admin who is acting.
pub async fn set_user_roles(
    ctx: &AppContext,
    user_id: Option<&str>,
    target_id: &str,
    is_admin: bool,
    is_escrow_agent: bool,
) -> ApiResult<UserProfile> {
    let admin = ctx.navigator.require(Route::AdminUsers, user_id).await?;

    if admin.user_id == target_id && !is_admin {
        return Err(ApiError::validation("Admins cannot revoke their own admin role"));
    }

    ctx.db.users().set_roles(target_id, is_admin, is_escrow_agent).await?;
    info!(target = %target_id, is_admin, is_escrow_agent, by = %admin.user_id, "Roles changed");

    ctx.db
        .users()
        .get_by_id(target_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", target_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::ConfigState;

    #[tokio::test]
    async fn test_admin_manages_roles() {
        let ctx = AppContext::in_memory(ConfigState::default()).await.unwrap();
        let mut admin = UserProfile::new("admin@shop.dev", "Admin");
        admin.is_admin = true;
        ctx.db.users().insert(&admin).await.unwrap();
        let acting = Some(admin.id.as_str());

        let agent = create_user(
            &ctx,
            acting,
            UserForm {
                email: "agent@shop.dev".into(),
                display_name: "Agent".into(),
                is_admin: false,
                is_escrow_agent: false,
            },
        )
        .await
        .unwrap();

        let promoted = set_user_roles(&ctx, acting, &agent.id, false, true).await.unwrap();
        assert!(promoted.is_escrow_agent);
        assert_eq!(list_users(&ctx, acting).await.unwrap().len(), 2);

        // Escrow agents are not admins
        let err = list_users(&ctx, Some(agent.id.as_str())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = set_user_roles(&ctx, acting, &admin.id, false, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_current_user() {
        let ctx = AppContext::in_memory(ConfigState::default()).await.unwrap();
        let user = ctx.db.users().insert(&UserProfile::new("a@b.co", "A")).await.unwrap();

        assert_eq!(current_user(&ctx, Some(user.id.as_str())).await.unwrap().id, user.id);
        assert_eq!(current_user(&ctx, None).await.unwrap_err().code, ErrorCode::Unauthorized);
        assert_eq!(
            current_user(&ctx, Some("ghost")).await.unwrap_err().code,
            ErrorCode::Unauthorized
        );
    }

    #[tokio::test]
    async fn test_update_own_profile() {
        let ctx = AppContext::in_memory(ConfigState::default()).await.unwrap();
        let user = ctx.db.users().insert(&UserProfile::new("a@b.co", "A")).await.unwrap();
        ctx.db.users().insert(&UserProfile::new("taken@b.co", "B")).await.unwrap();
        let me = Some(user.id.as_str());

        let updated = update_profile(&ctx, me, None, Some(" Alice ".into())).await.unwrap();
        assert_eq!(updated.display_name, "Alice");
        assert_eq!(updated.email, "a@b.co");

        let err = update_profile(&ctx, me, Some("taken@b.co".into()), None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = update_profile(&ctx, None, None, Some("X".into())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let ctx = AppContext::in_memory(ConfigState::default()).await.unwrap();
        let mut admin = UserProfile::new("admin@shop.dev", "Admin");
        admin.is_admin = true;
        ctx.db.users().insert(&admin).await.unwrap();

        let err = create_user(
            &ctx,
            Some(admin.id.as_str()),
            UserForm {
                email: "not-an-email".into(),
                display_name: "X".into(),
                ..UserForm::default()
            },
        )
        .await
        .unwrap_err();
        assert!(err.fields.unwrap().get("email").is_some());
    }
}
