pub mod coupon;
pub mod health;
pub mod my_coupon;
pub mod user;

use std::sync::Arc;

use axum::Router;

use crate::auth::jwt::JwtConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /user/login                   login (public)
/// /user/register                register (public)
/// /user/profile                 get, update own profile (auth)
/// /user/roles                   role catalogue (admin)
/// /user/add                     create user (admin)
/// /user/list                    list users (admin)
/// /user/update                  update user (admin)
/// /user/delete/{id}             delete user (admin)
///
/// /coupon/types                 coupon-type catalogue (auth)
/// /coupon/add                   add one coupon (stock)
/// /coupon/import                bulk import (stock)
/// /coupon/list                  filtered stock listing (stock)
/// /coupon/detail/{id}           coupon detail (stock)
/// /coupon/update                edit unclaimed coupon (stock)
/// /coupon/delete/{id}           delete unclaimed coupon (stock)
///
/// /my-coupon/list               own claimed coupons (auth)
/// /my-coupon/detail/{id}        own coupon with code (auth)
/// /my-coupon/stock              available count per type (auth)
/// /my-coupon/take               claim a coupon (apply_coupon)
/// ```
pub fn api_routes(jwt: Arc<JwtConfig>) -> Router<AppState> {
    Router::new()
        .nest("/user", user::router(Arc::clone(&jwt)))
        .nest("/coupon", coupon::router(Arc::clone(&jwt)))
        .nest("/my-coupon", my_coupon::router(jwt))
}
