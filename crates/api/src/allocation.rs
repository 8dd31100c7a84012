//! Coupon allocation: hand one unclaimed coupon of a type to a caller.
//!
//! A claim moves through validation, the cooldown check, selection of the
//! lowest-id available coupon, the conditional claim statement, and a
//! confirmation read. The store is the only arbiter under concurrency: if two
//! callers select the same coupon, the `WHERE taker = 0` update lets exactly
//! one of them through and the other gets [`CoreError::AlreadyClaimed`].
//! There is no automatic retry.

use coupon_core::error::CoreError;
use coupon_core::types::{now_millis, DbId, Timestamp};
use coupon_core::{cooldown, coupon_types};
use coupon_db::models::coupon::Coupon;
use coupon_db::repositories::CouponRepo;
use coupon_db::DbPool;

use crate::error::AppResult;

/// Claim one coupon of `coupon_type` for `user_id` at the current time.
pub async fn claim(pool: &DbPool, user_id: DbId, coupon_type: i64) -> AppResult<Coupon> {
    claim_at(pool, user_id, coupon_type, now_millis()).await
}

/// Claim one coupon of `coupon_type` for `user_id` as of `now` (ms).
pub async fn claim_at(
    pool: &DbPool,
    user_id: DbId,
    coupon_type: i64,
    now: Timestamp,
) -> AppResult<Coupon> {
    coupon_types::validate(coupon_type)?;

    let last = CouponRepo::most_recent_by_taker_and_type(pool, user_id, coupon_type).await?;
    cooldown::check(last.map(|c| c.updated_at), now)?;

    let candidate = CouponRepo::find_available_one(pool, coupon_type)
        .await?
        .ok_or(CoreError::OutOfStock(coupon_type))?;

    claim_candidate(pool, &candidate, user_id, now).await
}

/// Conditionally assign an already selected `candidate` to `user_id` and
/// return the stored row.
///
/// Fails with [`CoreError::AlreadyClaimed`] if the coupon was taken after
/// it was selected; the existing taker is left untouched.
pub async fn claim_candidate(
    pool: &DbPool,
    candidate: &Coupon,
    user_id: DbId,
    now: Timestamp,
) -> AppResult<Coupon> {
    let claimed = CouponRepo::claim(pool, candidate.id, user_id, now).await?;
    if claimed == 0 {
        tracing::info!(
            coupon_id = candidate.id,
            user_id,
            coupon_type = candidate.coupon_type,
            "Lost claim race"
        );
        return Err(CoreError::AlreadyClaimed(candidate.id).into());
    }

    let coupon = CouponRepo::find_by_id(pool, candidate.id)
        .await?
        .ok_or_else(|| {
            CoreError::Internal(format!("Coupon {} vanished after claim", candidate.id))
        })?;

    tracing::info!(
        coupon_id = coupon.id,
        user_id,
        coupon_type = coupon.coupon_type,
        "Coupon claimed"
    );
    Ok(coupon)
}
