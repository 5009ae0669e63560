//! # Chat Commands
//!
//! Direct messages between signed-in users, typically a buyer, a seller and
//! the escrow agent holding a trade. History is read by polling.
//!
//! ```text
//!   send_message(me, them, body)
//!        │  require(Route::Chat)   one role lookup
//!        │  recipient exists?
//!        ▼
//!   ChatMessage::new ──► MessageRepository::append
//! ```

use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;
use storefront_core::{ChatMessage, Route};

const DEFAULT_HISTORY: u32 = 50;

/// One entry in a user's inbox.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub user_id: String,
    /// `None` when the other user has since been removed.
    pub display_name: Option<String>,
}

pub async fn send_message(
    ctx: &AppContext,
    user_id: Option<&str>,
    recipient_id: &str,
    body: &str,
) -> ApiResult<ChatMessage> {
    let sender = ctx.navigator.require(Route::Chat, user_id).await?;

    if ctx.db.users().get_by_id(recipient_id).await?.is_none() {
        return Err(ApiError::not_found("User", recipient_id));
    }

    let message = ChatMessage::new(&sender.user_id, recipient_id, body)?;
    ctx.db.messages().append(&message).await?;
    debug!(conversation = %message.conversation_id, "Message sent");
    Ok(message)
}

/// The latest messages between the signed-in user and `other_id`, oldest first.
pub async fn conversation(
    ctx: &AppContext,
    user_id: Option<&str>,
    other_id: &str,
    limit: Option<u32>,
) -> ApiResult<Vec<ChatMessage>> {
    let me = ctx.navigator.require(Route::Chat, user_id).await?;
    let limit = limit.unwrap_or(DEFAULT_HISTORY).clamp(1, 500);

    Ok(ctx
        .db
        .messages()
        .list_conversation(&me.user_id, other_id, limit)
        .await?)
}

/// Everyone the signed-in user has talked to, most recent first.
pub async fn inbox(ctx: &AppContext, user_id: Option<&str>) -> ApiResult<Vec<ConversationSummary>> {
    let me = ctx.navigator.require(Route::Chat, user_id).await?;

    let partners = ctx.db.messages().conversations_for(&me.user_id).await?;
    let users = ctx.db.users().list().await?;

    Ok(partners
        .into_iter()
        .map(|id| ConversationSummary {
            display_name: users
                .iter()
                .find(|u| u.id == id)
                .map(|u| u.display_name.clone()),
            user_id: id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::ConfigState;
    use storefront_core::UserProfile;

    async fn context() -> (AppContext, UserProfile, UserProfile) {
        let ctx = AppContext::in_memory(ConfigState::default()).await.unwrap();
        let buyer = ctx.db.users().insert(&UserProfile::new("b@x.co", "Buyer")).await.unwrap();
        let seller = ctx.db.users().insert(&UserProfile::new("s@x.co", "Seller")).await.unwrap();
        (ctx, buyer, seller)
    }

    #[tokio::test]
    async fn test_send_and_read_both_ways() {
        let (ctx, buyer, seller) = context().await;

        send_message(&ctx, Some(buyer.id.as_str()), &seller.id, "Still available?").await.unwrap();
        send_message(&ctx, Some(seller.id.as_str()), &buyer.id, "Yes").await.unwrap();

        let from_seller = conversation(&ctx, Some(seller.id.as_str()), &buyer.id, None).await.unwrap();
        let bodies: Vec<&str> = from_seller.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["Still available?", "Yes"]);

        let inbox = inbox(&ctx, Some(buyer.id.as_str())).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].user_id, seller.id);
        assert_eq!(inbox[0].display_name.as_deref(), Some("Seller"));
    }

    #[tokio::test]
    async fn test_rejections() {
        let (ctx, buyer, seller) = context().await;

        let err = send_message(&ctx, None, &seller.id, "hi").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let err = send_message(&ctx, Some(buyer.id.as_str()), "ghost", "hi").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = send_message(&ctx, Some(buyer.id.as_str()), &buyer.id, "hi").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let err = send_message(&ctx, Some(buyer.id.as_str()), &seller.id, "   ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
