//! Domain logic for the coupon service.
//!
//! Everything here is pure (no database, no HTTP) so it can be unit tested
//! in isolation and shared by the repository and API layers.

pub mod cooldown;
pub mod coupon_import;
pub mod coupon_types;
pub mod error;
pub mod roles;
pub mod types;
