//! Route definitions for the `/coupon` resource.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use coupon_core::roles;

use crate::auth::jwt::JwtConfig;
use crate::handlers::coupon;
use crate::middleware::guard::GuardedRoutes;
use crate::state::AppState;

/// Routes mounted at `/coupon`.
///
/// ```text
/// GET    /types         -> list_types      (auth)
/// POST   /add           -> add_coupon      (stock)
/// POST   /import        -> import_coupons  (stock)
/// GET    /list          -> list_coupons    (stock)
/// GET    /detail/{id}   -> get_coupon      (stock)
/// PUT    /update        -> update_coupon   (stock)
/// DELETE /delete/{id}   -> delete_coupon   (stock)
/// ```
pub fn router(jwt: Arc<JwtConfig>) -> Router<AppState> {
    GuardedRoutes::new(jwt)
        .authenticate()
        .route("/types", get(coupon::list_types))
        .require(roles::STOCK)
        .route("/add", post(coupon::add_coupon))
        .route("/import", post(coupon::import_coupons))
        .route("/list", get(coupon::list_coupons))
        .route("/detail/{id}", get(coupon::get_coupon))
        .route("/update", put(coupon::update_coupon))
        .route("/delete/{id}", delete(coupon::delete_coupon))
        .into_router()
}
