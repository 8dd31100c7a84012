pub mod coupon;
pub mod my_coupon;
pub mod user;
