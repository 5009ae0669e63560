//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │   PromoCode     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  code (UPPER)   │       │
//! │  │  price          │◄──│  name           │   │  percentage     │       │
//! │  │  category_id ───┼──►│                 │   │  product_id?    │       │
//! │  │  promo flags    │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  UserProfile    │   │  ChatMessage    │                             │
//! │  │  is_admin       │   │  conversation   │                             │
//! │  │  is_escrow_agent│   │  sender → recip │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `category_id` is a weak reference: a product may point at a category that
//! no longer exists, and the name simply fails to resolve.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Generates a new entity ID.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Product
// =============================================================================

/// A product listed in the storefront.
///
/// Serialized camelCase because the cart storage slot embeds product
/// snapshots and the web storefront reads them directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Long-form description.
    #[serde(default)]
    pub description: String,

    /// Base price before any discount.
    pub price: Money,

    /// Ordered image references (URLs or storage paths).
    #[serde(default)]
    pub images: Vec<String>,

    /// Category this product is listed under, if any.
    #[serde(default)]
    pub category_id: Option<String>,

    /// Whether the product's discount is switched on.
    #[serde(default)]
    pub promo_active: bool,

    /// Discount in whole percent (0-100).
    #[serde(default)]
    pub discount_percentage: Option<u8>,

    /// When true the discount is applied storefront-wide; when false a
    /// promo code has to be entered.
    #[serde(default)]
    pub has_public_discount: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates an undiscounted, uncategorized product with a fresh id.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        let now = Utc::now();
        Product {
            id: new_id(),
            name: name.into(),
            description: String::new(),
            price,
            images: Vec::new(),
            category_id: None,
            promo_active: false,
            discount_percentage: None,
            has_public_discount: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the storefront shows and applies the discount without a code.
    pub fn has_public_promo(&self) -> bool {
        self.promo_active && self.has_public_discount && self.discount_percentage.is_some()
    }

    /// First image reference, used as the thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Resolves this product's category name against a loaded category list.
    ///
    /// Returns `None` both for uncategorized products and for dangling ids.
    pub fn category_name<'a>(&self, categories: &'a [Category]) -> Option<&'a str> {
        let id = self.category_id.as_deref()?;
        categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Category {
            id: new_id(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Promo Code
// =============================================================================

/// A manually entered discount code.
///
/// `product_id: None` makes the code apply to every line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PromoCode {
    pub id: String,
    /// Always stored normalized (see [`PromoCode::normalize`]).
    pub code: String,
    pub discount_percentage: u8,
    pub product_id: Option<String>,
    pub is_active: bool,
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl PromoCode {
    /// Canonical form of a code as typed by a shopper: trimmed, upper-case.
    ///
    /// ```rust
    /// use storefront_core::PromoCode;
    ///
    /// assert_eq!(PromoCode::normalize("  summer10 "), "SUMMER10");
    /// ```
    pub fn normalize(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Checks that the code can be redeemed at `now`.
    pub fn check(&self, now: DateTime<Utc>) -> CoreResult<()> {
        if !self.is_active {
            return Err(CoreError::PromoInactive {
                code: self.code.clone(),
            });
        }
        if self.expires_at.is_some_and(|expiry| expiry <= now) {
            return Err(CoreError::PromoExpired {
                code: self.code.clone(),
            });
        }
        Ok(())
    }

    /// Whether the code targets this product (cart-wide codes target all).
    pub fn applies_to(&self, product_id: &str) -> bool {
        self.product_id.as_deref().map_or(true, |id| id == product_id)
    }
}

// =============================================================================
// User Profile
// =============================================================================

/// A storefront user with the role flags consulted by route guards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub is_escrow_agent: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        UserProfile {
            id: new_id(),
            email: email.into(),
            display_name: display_name.into(),
            is_admin: false,
            is_escrow_agent: false,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Chat
// =============================================================================

/// Identifies the conversation between two users regardless of who writes first.
///
/// ```rust
/// use storefront_core::conversation_id;
///
/// assert_eq!(conversation_id("bob", "alice"), conversation_id("alice", "bob"));
/// ```
pub fn conversation_id(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

/// One append-only chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub body: String,
    #[ts(as = "String")]
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Builds a message, rejecting empty, oversized and self-addressed ones.
    pub fn new(sender_id: &str, recipient_id: &str, body: &str) -> CoreResult<Self> {
        if sender_id == recipient_id {
            return Err(CoreError::SelfMessage);
        }
        crate::validation::validate_message_body(body)?;

        Ok(ChatMessage {
            id: new_id(),
            conversation_id: conversation_id(sender_id, recipient_id),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            body: body.trim().to_string(),
            sent_at: Utc::now(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(is_active: bool, expires_at: Option<DateTime<Utc>>) -> PromoCode {
        let now = Utc::now();
        PromoCode {
            id: new_id(),
            code: "WELCOME".to_string(),
            discount_percentage: 10,
            product_id: None,
            is_active,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_category_name_resolves() {
        let shoes = Category::new("Shoes");
        let mut product = Product::new("Trail shoes", Money::from_cents(5000));
        product.category_id = Some(shoes.id.clone());

        let categories = vec![shoes];
        assert_eq!(product.category_name(&categories), Some("Shoes"));
    }

    #[test]
    fn test_dangling_category_resolves_to_none() {
        let mut product = Product::new("Orphan", Money::from_cents(100));
        product.category_id = Some("deleted-category".to_string());

        assert_eq!(product.category_name(&[Category::new("Shoes")]), None);
    }

    #[test]
    fn test_missing_discount_fields_deserialize_as_no_discount() {
        let json = r#"{
            "id": "p1",
            "name": "Plain",
            "price": 1000,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert!(!product.promo_active);
        assert!(!product.has_public_discount);
        assert_eq!(product.discount_percentage, None);
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_promo_check() {
        let now = Utc::now();

        assert!(promo(true, None).check(now).is_ok());
        assert!(promo(true, Some(now + Duration::days(1))).check(now).is_ok());
        assert!(matches!(
            promo(false, None).check(now),
            Err(CoreError::PromoInactive { .. })
        ));
        assert!(matches!(
            promo(true, Some(now - Duration::days(1))).check(now),
            Err(CoreError::PromoExpired { .. })
        ));
    }

    #[test]
    fn test_promo_applies_to() {
        let mut code = promo(true, None);
        assert!(code.applies_to("anything"));

        code.product_id = Some("p1".to_string());
        assert!(code.applies_to("p1"));
        assert!(!code.applies_to("p2"));
    }

    #[test]
    fn test_chat_message_rules() {
        let message = ChatMessage::new("alice", "bob", "  is this still available? ").unwrap();
        assert_eq!(message.conversation_id, "alice:bob");
        assert_eq!(message.body, "is this still available?");

        assert!(matches!(
            ChatMessage::new("alice", "alice", "hi"),
            Err(CoreError::SelfMessage)
        ));
        assert!(ChatMessage::new("alice", "bob", "   ").is_err());
    }
}
