//! Route-group builder with forward-accumulating access requirements.
//!
//! Calling [`GuardedRoutes::authenticate`] or [`GuardedRoutes::require`]
//! only affects routes registered *after* the call:
//!
//! ```ignore
//! GuardedRoutes::new(jwt)
//!     .route("/login", post(login))         // public
//!     .authenticate()
//!     .route("/profile", get(profile))      // token required
//!     .require(roles::ADMIN)
//!     .route("/list", get(list_users))      // token + admin bit
//!     .into_router()
//! ```
//!
//! Each route gets its own layers at registration time. Authentication runs
//! first, then role checks in the order they were required.

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::MethodRouter;
use axum::Router;
use coupon_core::roles::Role;

use super::auth::authenticate;
use super::rbac::require_role;
use crate::auth::jwt::JwtConfig;

pub struct GuardedRoutes<S> {
    router: Router<S>,
    jwt: Arc<JwtConfig>,
    authenticated: bool,
    required: Vec<Role>,
}

impl<S> GuardedRoutes<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(jwt: Arc<JwtConfig>) -> Self {
        Self {
            router: Router::new(),
            jwt,
            authenticated: false,
            required: Vec::new(),
        }
    }

    /// Require a valid token on every route registered after this call.
    pub fn authenticate(mut self) -> Self {
        self.authenticated = true;
        self
    }

    /// Require `role` (and, implicitly, a valid token) on every route
    /// registered after this call.
    pub fn require(mut self, role: Role) -> Self {
        self.authenticated = true;
        self.required.push(role);
        self
    }

    /// Register `method_router` at `path` under the requirements accumulated so far.
    pub fn route(mut self, path: &str, method_router: MethodRouter<S>) -> Self {
        let mut method_router = method_router;

        // Layers added later run earlier, so push role checks innermost-first.
        for role in self.required.iter().rev() {
            method_router = method_router.route_layer(from_fn_with_state(*role, require_role));
        }
        if self.authenticated {
            method_router =
                method_router.route_layer(from_fn_with_state(Arc::clone(&self.jwt), authenticate));
        }

        self.router = self.router.route(path, method_router);
        self
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}
