//! # Access Control
//!
//! Which routes a user may open.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Route                     Requirement     Anonymous   User   Agent  Admin
//! │  ─────                     ───────────     ─────────   ────   ─────  ─────
//! │  Home / Catalog / Product  Public          ✓           ✓      ✓      ✓
//! │  Cart                      Public          ✓           ✓      ✓      ✓
//! │  Chat                      SignedIn        login       ✓      ✓      ✓
//! │  EscrowDesk                EscrowAgent     login       ✗      ✓      ✓
//! │  Admin*                    Admin           login       ✗      ✗      ✓
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decision is pure. Looking up a user's role flags is the app's job.

use serde::{Deserialize, Serialize};

use crate::types::UserProfile;

/// The signed-in user as seen by route guards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: String,
    pub is_admin: bool,
    pub is_escrow_agent: bool,
}

impl From<&UserProfile> for Principal {
    fn from(user: &UserProfile) -> Self {
        Principal {
            user_id: user.id.clone(),
            is_admin: user.is_admin,
            is_escrow_agent: user.is_escrow_agent,
        }
    }
}

/// Every navigable view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", content = "id", rename_all = "snake_case")]
pub enum Route {
    Home,
    Catalog,
    Product(String),
    Cart,
    Chat,
    EscrowDesk,
    AdminProducts,
    AdminCategories,
    AdminPromoCodes,
    AdminUsers,
}

/// What a route asks of the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    SignedIn,
    EscrowAgent,
    Admin,
}

impl Route {
    pub fn requirement(&self) -> Requirement {
        match self {
            Route::Home | Route::Catalog | Route::Product(_) | Route::Cart => Requirement::Public,
            Route::Chat => Requirement::SignedIn,
            Route::EscrowDesk => Requirement::EscrowAgent,
            Route::AdminProducts
            | Route::AdminCategories
            | Route::AdminPromoCodes
            | Route::AdminUsers => Requirement::Admin,
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    /// Nobody is signed in; send them to the login view.
    RedirectToLogin,
    /// Signed in, but without the needed role.
    Forbidden,
}

/// Decides whether `principal` may open `route`.
///
/// ```rust
/// use storefront_core::{authorize, AccessDecision, Route};
///
/// assert_eq!(authorize(&Route::Catalog, None), AccessDecision::Allow);
/// assert_eq!(authorize(&Route::AdminUsers, None), AccessDecision::RedirectToLogin);
/// ```
pub fn authorize(route: &Route, principal: Option<&Principal>) -> AccessDecision {
    let requirement = route.requirement();
    if requirement == Requirement::Public {
        return AccessDecision::Allow;
    }

    let Some(principal) = principal else {
        return AccessDecision::RedirectToLogin;
    };

    let allowed = match requirement {
        Requirement::Public | Requirement::SignedIn => true,
        Requirement::EscrowAgent => principal.is_escrow_agent || principal.is_admin,
        Requirement::Admin => principal.is_admin,
    };

    if allowed {
        AccessDecision::Allow
    } else {
        AccessDecision::Forbidden
    }
}
