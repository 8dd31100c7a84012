//! Route definitions for the `/user` resource.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use coupon_core::roles;

use crate::auth::jwt::JwtConfig;
use crate::handlers::user;
use crate::middleware::guard::GuardedRoutes;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// POST   /login         -> login
/// POST   /register      -> register
/// GET    /profile       -> get_profile     (auth)
/// PUT    /profile       -> update_profile  (auth)
/// GET    /roles         -> list_roles      (admin)
/// POST   /add           -> add_user        (admin)
/// GET    /list          -> list_users      (admin)
/// PUT    /update        -> update_user     (admin)
/// DELETE /delete/{id}   -> delete_user     (admin)
/// ```
pub fn router(jwt: Arc<JwtConfig>) -> Router<AppState> {
    GuardedRoutes::new(jwt)
        .route("/login", post(user::login))
        .route("/register", post(user::register))
        .authenticate()
        .route(
            "/profile",
            get(user::get_profile).put(user::update_profile),
        )
        .require(roles::ADMIN)
        .route("/roles", get(user::list_roles))
        .route("/add", post(user::add_user))
        .route("/list", get(user::list_users))
        .route("/update", put(user::update_user))
        .route("/delete/{id}", delete(user::delete_user))
        .into_router()
}
