//! User entity model and DTOs.

use coupon_core::roles::RoleMask;
use coupon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub account: String,
    pub password_hash: String,
    pub role: i64,
    pub private_key: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn role_mask(&self) -> RoleMask {
        RoleMask::from_bits(self.role)
    }
}

/// Safe user representation for API responses (no password hash or key).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub account: String,
    pub role: RoleMask,
    /// Catalogue names of the bits set in `role`.
    pub role_names: Vec<&'static str>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let role = user.role_mask();
        Self {
            id: user.id,
            name: user.name.clone(),
            account: user.account.clone(),
            role,
            role_names: role.names(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub account: String,
    pub password_hash: String,
    pub role: RoleMask,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub account: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<RoleMask>,
    pub private_key: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.account.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.private_key.is_none()
    }
}
