//! Handlers for the `/coupon` resource (stock management).

use axum::extract::State;
use coupon_core::coupon_import::{parse_codes, ImportReport};
use coupon_core::coupon_types::{self, CouponType};
use coupon_core::error::CoreError;
use coupon_core::types::{now_millis, DbId, Timestamp};
use coupon_db::models::coupon::{Coupon, CouponFilter, CreateCoupon, UpdateCoupon};
use coupon_db::repositories::CouponRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::{ok, ApiResponse, ListResponse, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /coupon/add`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCouponRequest {
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: i64,
}

/// Request body for `POST /coupon/import`.
///
/// `codes` is free text: one or more codes per line, comma separated.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub codes: String,
    #[serde(rename = "type")]
    pub coupon_type: i64,
}

/// Request body for `PUT /coupon/update`. An empty `code` is ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateCouponRequest {
    pub id: DbId,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub coupon_type: Option<i64>,
}

/// Query filters for `GET /coupon/list`.
#[derive(Debug, Deserialize)]
pub struct CouponListParams {
    #[serde(rename = "type")]
    pub coupon_type: Option<i64>,
    /// `1` = claimed only, `0` = unclaimed only.
    pub taken: Option<i64>,
}

impl CouponListParams {
    fn to_filter(&self) -> AppResult<CouponFilter> {
        let taken = match self.taken {
            None => None,
            Some(1) => Some(true),
            Some(0) => Some(false),
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "taken must be 0 or 1, got {other}"
                )))
            }
        };
        Ok(CouponFilter {
            coupon_type: self.coupon_type,
            taken,
        })
    }
}

/// Stock-management view of a coupon.
#[derive(Debug, Serialize)]
pub struct CouponItem {
    pub id: DbId,
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: i64,
    pub type_name: &'static str,
    pub creator: DbId,
    pub taker: DbId,
    pub is_taken: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Coupon> for CouponItem {
    fn from(c: &Coupon) -> Self {
        Self {
            id: c.id,
            code: c.code.clone(),
            coupon_type: c.coupon_type,
            type_name: coupon_types::name_of(c.coupon_type),
            creator: c.creator,
            taker: c.taker,
            is_taken: c.is_claimed(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/coupon/types
pub async fn list_types() -> Json<ApiResponse<ListResponse<CouponType>>> {
    ok(ListResponse {
        list: coupon_types::all_coupon_types().to_vec(),
    })
}

/// POST /api/v1/coupon/add
pub async fn add_coupon(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<AddCouponRequest>,
) -> AppResult<Json<ApiResponse<CouponItem>>> {
    input.validate()?;
    coupon_types::validate(input.coupon_type)?;

    let code = input.code.trim().to_string();
    coupon_types::validate_code(&code)?;
    ensure_code_free(&state, &code, None).await?;

    let create = CreateCoupon {
        code,
        coupon_type: input.coupon_type,
        creator: auth.user_id,
    };
    let coupon = CouponRepo::create(&state.pool, &create)
        .await
        .map_err(|e| duplicate_code(e, &create.code))?;

    tracing::info!(coupon_id = coupon.id, creator = auth.user_id, "Coupon added");
    Ok(ok(CouponItem::from(&coupon)))
}

/// POST /api/v1/coupon/import
///
/// Inserts every new code in one transaction. Codes already in stock are
/// reported back as duplicates instead of failing the batch.
pub async fn import_coupons(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ImportRequest>,
) -> AppResult<Json<ApiResponse<ImportReport>>> {
    coupon_types::validate(input.coupon_type)?;

    let codes = parse_codes(&input.codes);
    if codes.is_empty() {
        return Err(AppError::BadRequest("No coupon codes in input".into()));
    }
    for code in &codes {
        coupon_types::validate_code(code)?;
    }

    let batch: Vec<CreateCoupon> = codes
        .iter()
        .map(|code| CreateCoupon {
            code: code.clone(),
            coupon_type: input.coupon_type,
            creator: auth.user_id,
        })
        .collect();
    let inserted = CouponRepo::bulk_create(&state.pool, &batch).await?;
    let report = ImportReport::tally(&codes, &inserted);

    tracing::info!(
        creator = auth.user_id,
        total = report.total,
        created = report.created,
        duplicates = report.duplicates.len(),
        "Coupons imported",
    );
    Ok(ok(report))
}

/// GET /api/v1/coupon/list
pub async fn list_coupons(
    State(state): State<AppState>,
    Query(paging): Query<PageParams>,
    Query(params): Query<CouponListParams>,
) -> AppResult<Json<ApiResponse<Page<CouponItem>>>> {
    let filter = params.to_filter()?;
    let coupons =
        CouponRepo::list_filtered(&state.pool, filter, paging.offset(), paging.size()).await?;
    let total = CouponRepo::count_filtered(&state.pool, filter).await?;

    Ok(ok(Page {
        list: coupons.iter().map(CouponItem::from).collect(),
        total,
        page: paging.page(),
        size: paging.size(),
    }))
}

/// GET /api/v1/coupon/detail/{id}
pub async fn get_coupon(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<CouponItem>>> {
    let coupon = find_coupon(&state, id).await?;
    Ok(ok(CouponItem::from(&coupon)))
}

/// PUT /api/v1/coupon/update
///
/// Only unclaimed coupons can be edited; a claim that lands between the
/// pre-read and the update still wins.
pub async fn update_coupon(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateCouponRequest>,
) -> AppResult<Json<ApiResponse<CouponItem>>> {
    let existing = find_coupon(&state, input.id).await?;
    if existing.is_claimed() {
        return Err(CoreError::CouponLocked(existing.id).into());
    }

    let code = input
        .code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    if let Some(code) = &code {
        coupon_types::validate_code(code)?;
        ensure_code_free(&state, code, Some(existing.id)).await?;
    }
    if let Some(coupon_type) = input.coupon_type {
        coupon_types::validate(coupon_type)?;
    }

    let update = UpdateCoupon {
        code,
        coupon_type: input.coupon_type,
    };
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let updated = CouponRepo::update_unclaimed(&state.pool, existing.id, &update, now_millis())
        .await
        .map_err(|e| duplicate_code(e, update.code.as_deref().unwrap_or_default()))?;
    let coupon = match updated {
        Some(coupon) => coupon,
        None => return Err(locked_or_missing(&state, existing.id).await),
    };

    tracing::info!(coupon_id = coupon.id, editor = auth.user_id, "Coupon updated");
    Ok(ok(CouponItem::from(&coupon)))
}

/// DELETE /api/v1/coupon/delete/{id}
pub async fn delete_coupon(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let existing = find_coupon(&state, id).await?;
    if existing.is_claimed() {
        return Err(CoreError::CouponLocked(id).into());
    }

    if !CouponRepo::delete_unclaimed(&state.pool, id).await? {
        return Err(locked_or_missing(&state, id).await);
    }

    tracing::info!(coupon_id = id, editor = auth.user_id, "Coupon deleted");
    Ok(ok(()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_coupon(state: &AppState, id: DbId) -> AppResult<Coupon> {
    CouponRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Coupon", id }.into())
}

/// Fail with `DuplicateCode` if `code` is held by a coupon other than `except`.
async fn ensure_code_free(state: &AppState, code: &str, except: Option<DbId>) -> AppResult<()> {
    match CouponRepo::find_by_code(&state.pool, code).await? {
        Some(existing) if Some(existing.id) != except => {
            Err(CoreError::DuplicateCode(code.to_string()).into())
        }
        _ => Ok(()),
    }
}

/// The unique constraint is authoritative: a concurrent insert of the same
/// code that slipped past the pre-check still ends up here.
fn duplicate_code(err: sqlx::Error, code: &str) -> AppError {
    if coupon_db::is_unique_violation(&err) {
        return CoreError::DuplicateCode(code.to_string()).into();
    }
    err.into()
}

/// A conditional update or delete touched no row: decide whether the coupon
/// was claimed or removed in the meantime.
async fn locked_or_missing(state: &AppState, id: DbId) -> AppError {
    match CouponRepo::find_by_id(&state.pool, id).await {
        Ok(Some(_)) => CoreError::CouponLocked(id).into(),
        Ok(None) => CoreError::NotFound { entity: "Coupon", id }.into(),
        Err(e) => e.into(),
    }
}
