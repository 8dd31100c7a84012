//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

pub mod coupon_repo;
pub mod user_repo;

pub use coupon_repo::CouponRepo;
pub use user_repo::UserRepo;
