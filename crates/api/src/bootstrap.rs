//! Startup seeding of the administrator account.

use coupon_core::roles;
use coupon_db::models::user::CreateUser;
use coupon_db::repositories::UserRepo;
use coupon_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Login account of the seeded administrator.
pub const ADMIN_ACCOUNT: &str = "admin";

/// Create the `admin` account holding every role bit, unless it exists.
///
/// Returns `true` if the account was created by this call. An existing
/// account is left untouched, password included.
pub async fn ensure_admin(pool: &DbPool, password: &str) -> AppResult<bool> {
    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        name: "Administrator".to_string(),
        account: ADMIN_ACCOUNT.to_string(),
        password_hash,
        role: roles::merge(roles::all_roles()),
    };

    let created = UserRepo::create_if_absent(pool, &input).await?;
    if created {
        tracing::info!(account = ADMIN_ACCOUNT, "Created bootstrap admin account");
    }
    Ok(created)
}
