//! Route definitions for the `/my-coupon` resource.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use coupon_core::roles;

use crate::auth::jwt::JwtConfig;
use crate::handlers::my_coupon;
use crate::middleware::guard::GuardedRoutes;
use crate::state::AppState;

/// Routes mounted at `/my-coupon`.
///
/// ```text
/// GET  /list          -> list_mine  (auth)
/// GET  /detail/{id}   -> get_mine   (auth)
/// GET  /stock         -> stock      (auth)
/// POST /take          -> take       (apply_coupon)
/// ```
pub fn router(jwt: Arc<JwtConfig>) -> Router<AppState> {
    GuardedRoutes::new(jwt)
        .authenticate()
        .route("/list", get(my_coupon::list_mine))
        .route("/detail/{id}", get(my_coupon::get_mine))
        .route("/stock", get(my_coupon::stock))
        .require(roles::APPLY_COUPON)
        .route("/take", post(my_coupon::take))
        .into_router()
}
