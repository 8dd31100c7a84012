//! Role-based access control (RBAC) middleware.
//!
//! Runs after [`authenticate`](super::auth::authenticate) and rejects callers
//! whose token mask lacks the required bit. There is no superuser: an
//! administrator without the `stock` bit is refused on stock routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use coupon_core::error::CoreError;
use coupon_core::roles::{has_role, Role};

use super::auth::AuthUser;
use crate::error::AppError;

/// Middleware: require `role` on the authenticated caller. 403 otherwise.
pub async fn require_role(
    State(role): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req.extensions().get::<AuthUser>().copied().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Authentication required".into()))
    })?;

    if !has_role(user.role, role.mask) {
        tracing::debug!(
            user_id = user.user_id,
            required = role.name,
            "Role check failed"
        );
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Missing required permission: {}",
            role.name
        ))));
    }

    Ok(next.run(req).await)
}
