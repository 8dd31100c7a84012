//! Handlers for the `/my-coupon` resource: the caller's own coupons, stock
//! lookups, and claiming.

use axum::extract::State;
use coupon_core::coupon_types;
use coupon_core::error::CoreError;
use coupon_core::types::{DbId, Timestamp};
use coupon_db::models::coupon::Coupon;
use coupon_db::repositories::CouponRepo;
use serde::{Deserialize, Serialize};

use crate::allocation;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::query::{PageParams, TypeParams};
use crate::response::{ok, ApiResponse, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /my-coupon/take`.
#[derive(Debug, Deserialize)]
pub struct TakeRequest {
    #[serde(rename = "type")]
    pub coupon_type: i64,
}

/// List entry for a claimed coupon. The code itself is only shown in the detail view.
#[derive(Debug, Serialize)]
pub struct MyCouponItem {
    pub id: DbId,
    #[serde(rename = "type")]
    pub coupon_type: i64,
    pub type_name: &'static str,
    /// Claim time (the coupon's `updated_at`).
    pub taken_at: Timestamp,
    pub created_at: Timestamp,
}

impl From<&Coupon> for MyCouponItem {
    fn from(c: &Coupon) -> Self {
        Self {
            id: c.id,
            coupon_type: c.coupon_type,
            type_name: coupon_types::name_of(c.coupon_type),
            taken_at: c.updated_at,
            created_at: c.created_at,
        }
    }
}

/// A claimed coupon including its redeemable code.
#[derive(Debug, Serialize)]
pub struct MyCouponDetail {
    pub id: DbId,
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: i64,
    pub type_name: &'static str,
    pub taken_at: Timestamp,
    pub created_at: Timestamp,
}

impl From<&Coupon> for MyCouponDetail {
    fn from(c: &Coupon) -> Self {
        Self {
            id: c.id,
            code: c.code.clone(),
            coupon_type: c.coupon_type,
            type_name: coupon_types::name_of(c.coupon_type),
            taken_at: c.updated_at,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    #[serde(rename = "type")]
    pub coupon_type: i64,
    pub type_name: &'static str,
    pub stock: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/my-coupon/list
pub async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(paging): Query<PageParams>,
    Query(filter): Query<TypeParams>,
) -> AppResult<Json<ApiResponse<Page<MyCouponItem>>>> {
    let coupons = CouponRepo::list_by_taker(
        &state.pool,
        auth.user_id,
        filter.coupon_type,
        paging.offset(),
        paging.size(),
    )
    .await?;
    let total = CouponRepo::count_by_taker(&state.pool, auth.user_id, filter.coupon_type).await?;

    Ok(ok(Page {
        list: coupons.iter().map(MyCouponItem::from).collect(),
        total,
        page: paging.page(),
        size: paging.size(),
    }))
}

/// GET /api/v1/my-coupon/detail/{id}
///
/// 403 unless the caller is the coupon's taker.
pub async fn get_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<MyCouponDetail>>> {
    let coupon = CouponRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Coupon", id })?;

    if coupon.taker != auth.user_id {
        return Err(CoreError::Forbidden("This coupon belongs to someone else".into()).into());
    }

    Ok(ok(MyCouponDetail::from(&coupon)))
}

/// GET /api/v1/my-coupon/stock?type=
pub async fn stock(
    State(state): State<AppState>,
    Query(params): Query<TypeParams>,
) -> AppResult<Json<ApiResponse<StockResponse>>> {
    let coupon_type = params
        .coupon_type
        .ok_or_else(|| AppError::BadRequest("Missing type parameter".into()))?;
    let kind = coupon_types::validate(coupon_type)?;

    let stock = CouponRepo::count_available_by_type(&state.pool, coupon_type).await?;

    Ok(ok(StockResponse {
        coupon_type,
        type_name: kind.name,
        stock,
    }))
}

/// POST /api/v1/my-coupon/take
///
/// Claim one coupon of the requested type. See [`allocation::claim`].
pub async fn take(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<TakeRequest>,
) -> AppResult<Json<ApiResponse<MyCouponDetail>>> {
    let coupon = allocation::claim(&state.pool, auth.user_id, input.coupon_type).await?;
    Ok(ok(MyCouponDetail::from(&coupon)))
}
