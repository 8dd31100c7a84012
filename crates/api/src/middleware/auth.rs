//! JWT-based authentication middleware and the matching extractor.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use coupon_core::error::CoreError;
use coupon_core::roles::RoleMask;
use coupon_core::types::DbId;

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;

/// Authenticated caller, as proven by a verified access token.
///
/// Placed in request extensions by [`authenticate`]. Use it as an extractor
/// in handlers mounted behind an authenticated route group:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// Role mask snapshotted into the token.
    pub role: RoleMask,
}

impl AuthUser {
    /// Parse and verify the `Authorization: Bearer <token>` header.
    pub fn from_headers(headers: &HeaderMap, jwt: &JwtConfig) -> Result<Self, AppError> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().copied().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        })
    }
}

/// Middleware: verify the caller's token and attach an [`AuthUser`].
///
/// Aborts with 401 on a missing, malformed, expired or foreign token.
pub async fn authenticate(
    State(jwt): State<Arc<JwtConfig>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = AuthUser::from_headers(req.headers(), &jwt)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
