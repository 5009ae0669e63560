//! # Navigation Guard
//!
//! Every navigation asks one question of the role service, then lets
//! [`authorize`] decide.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Navigation                                           │
//! │                                                                         │
//! │  navigate(route, user_id)                                              │
//! │       │                                                                 │
//! │       ├── user_id = None ────────────────► principal = None             │
//! │       │                                                                 │
//! │       └── user_id = Some ──► RoleLookup::principal(id)   (exactly once) │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                        authorize(route, principal)                      │
//! │                                   │                                     │
//! │              ┌────────────────────┼──────────────────┐                  │
//! │              ▼                    ▼                  ▼                  │
//! │            Allow           RedirectToLogin       Forbidden              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An id the role service does not know is treated like no user at all.

use std::future::Future;

use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use storefront_core::{authorize, AccessDecision, Principal, Route};
use storefront_db::{DbResult, UserRepository};

/// The role service: who is this user and which flags do they carry.
pub trait RoleLookup: Send + Sync {
    fn principal(&self, user_id: &str) -> impl Future<Output = DbResult<Option<Principal>>> + Send;
}

impl RoleLookup for UserRepository {
    async fn principal(&self, user_id: &str) -> DbResult<Option<Principal>> {
        Ok(self.get_by_id(user_id).await?.as_ref().map(Principal::from))
    }
}

/// Outcome of one navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub route: Route,
    pub decision: AccessDecision,
    pub principal: Option<Principal>,
}

impl Navigation {
    pub fn is_allowed(&self) -> bool {
        self.decision == AccessDecision::Allow
    }
}

/// Route guard holding the single role-lookup capability.
#[derive(Debug, Clone)]
pub struct Navigator<L> {
    roles: L,
}

impl<L: RoleLookup> Navigator<L> {
    pub fn new(roles: L) -> Self {
        Navigator { roles }
    }

    /// Decides whether `user_id` may open `route`.
    pub async fn navigate(&self, route: Route, user_id: Option<&str>) -> ApiResult<Navigation> {
        let principal = match user_id {
            Some(id) => self.roles.principal(id).await?,
            None => None,
        };

        let decision = authorize(&route, principal.as_ref());
        debug!(?route, ?decision, user_id = ?user_id, "Navigation");

        Ok(Navigation {
            route,
            decision,
            principal,
        })
    }

    /// Guards a route that needs a signed-in user, returning that user.
    ///
    /// ## Returns
    /// * `Err(Unauthorized)` - Nobody (or an unknown id) is signed in
    /// * `Err(Forbidden)` - Signed in without the needed role
    pub async fn require(&self, route: Route, user_id: Option<&str>) -> ApiResult<Principal> {
        let what = format!("{:?}", route);
        let navigation = self.navigate(route, user_id).await?;

        match (navigation.decision, navigation.principal) {
            (AccessDecision::Allow, Some(principal)) => Ok(principal),
            (AccessDecision::Forbidden, _) => Err(ApiError::forbidden(&what)),
            _ => Err(ApiError::unauthorized()),
        }
    }
}
