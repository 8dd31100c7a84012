//! Access guard: authentication and role checks.
//!
//! - [`auth::authenticate`] -- verifies the Bearer token and stores an [`auth::AuthUser`].
//! - [`auth::AuthUser`] -- extractor for the identity placed by `authenticate`.
//! - [`rbac::require_role`] -- rejects callers whose mask lacks a role bit.
//! - [`guard::GuardedRoutes`] -- route-group builder wiring the two together.

pub mod auth;
pub mod guard;
pub mod rbac;
