//! Coupon entity model and DTOs.

use coupon_core::types::{DbId, Timestamp, NO_TAKER};
use serde::Serialize;
use sqlx::FromRow;

/// Full coupon row from the `coupons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Coupon {
    pub id: DbId,
    pub code: String,
    pub coupon_type: i64,
    pub creator: DbId,
    /// Claiming user, or [`NO_TAKER`] while unclaimed.
    pub taker: DbId,
    pub created_at: Timestamp,
    /// Doubles as the claim time once `taker` is set.
    pub updated_at: Timestamp,
}

impl Coupon {
    pub fn is_claimed(&self) -> bool {
        self.taker != NO_TAKER
    }
}

/// DTO for minting a new, unclaimed coupon.
#[derive(Debug, Clone)]
pub struct CreateCoupon {
    pub code: String,
    pub coupon_type: i64,
    pub creator: DbId,
}

/// DTO for editing an unclaimed coupon. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateCoupon {
    pub code: Option<String>,
    pub coupon_type: Option<i64>,
}

impl UpdateCoupon {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.coupon_type.is_none()
    }
}

/// Optional predicates for the stock listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponFilter {
    pub coupon_type: Option<i64>,
    /// `Some(true)` = claimed only, `Some(false)` = unclaimed only.
    pub taken: Option<bool>,
}
