//! Handlers for the `/user` resource: login, registration, profile and
//! administrator-managed accounts.

use axum::extract::State;
use coupon_core::error::CoreError;
use coupon_core::roles::{self, Role, RoleMask};
use coupon_core::types::DbId;
use coupon_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use coupon_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::{ok, ApiResponse, ListResponse, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /user/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub account: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub role: RoleMask,
    pub name: String,
}

/// Request body for `POST /user/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub account: String,
    pub password: String,
}

/// Request body for `POST /user/add`. `role` defaults to the login bit.
#[derive(Debug, Deserialize, Validate)]
pub struct AddUserRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub account: String,
    pub password: String,
    pub role: Option<RoleMask>,
}

/// Request body for `PUT /user/update`. Empty strings are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub id: DbId,
    #[validate(length(max = 64))]
    pub name: Option<String>,
    #[validate(length(max = 64))]
    pub account: Option<String>,
    pub password: Option<String>,
    pub role: Option<RoleMask>,
}

/// Request body for `PUT /user/profile`. Empty `name`/`password` are ignored;
/// an empty `private_key` clears it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 64))]
    pub name: Option<String>,
    pub password: Option<String>,
    pub private_key: Option<String>,
}

/// The caller's own account, including their private key.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub private_key: String,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            user: UserResponse::from(user),
            private_key: user.private_key.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/user/login
///
/// Exchange account + password for an access token. Accounts without the
/// `login` bit are refused with 403 even when the password is correct.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    input.validate()?;

    let user = UserRepo::find_by_account(&state.pool, &input.account)
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    let role = user.role_mask();
    if !role.has(roles::LOGIN) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is not permitted to log in".into(),
        )));
    }

    let jwt = &state.config.jwt;
    let token = generate_access_token(user.id, role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(ok(LoginResponse {
        token,
        expires_in: jwt.expires_in_secs(),
        role,
        name: user.name,
    }))
}

/// POST /api/v1/user/register
///
/// Self-service sign-up. New accounts hold no permissions until an
/// administrator grants them.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    input.validate()?;
    let user = create_user(&state, input.name, input.account, &input.password, RoleMask::EMPTY)
        .await?;
    Ok(ok(UserResponse::from(&user)))
}

// ---------------------------------------------------------------------------
// Authenticated handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<ProfileResponse>>> {
    let user = find_user(&state, auth.user_id).await?;
    Ok(ok(ProfileResponse::from(&user)))
}

/// PUT /api/v1/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<ProfileResponse>>> {
    input.validate()?;

    let update = UpdateUser {
        name: non_empty(input.name),
        password_hash: hash_optional_password(non_empty(input.password))?,
        private_key: input.private_key,
        ..Default::default()
    };
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    Ok(ok(ProfileResponse::from(&user)))
}

// ---------------------------------------------------------------------------
// Administrator handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/user/roles
pub async fn list_roles() -> Json<ApiResponse<ListResponse<Role>>> {
    ok(ListResponse {
        list: roles::all_roles().to_vec(),
    })
}

/// POST /api/v1/user/add
pub async fn add_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Json(input): Json<AddUserRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    input.validate()?;
    let role = input.role.unwrap_or(roles::LOGIN.mask);
    let user = create_user(&state, input.name, input.account, &input.password, role).await?;

    tracing::info!(admin_id = admin.user_id, user_id = user.id, role = role.bits(), "User added");
    Ok(ok(UserResponse::from(&user)))
}

/// GET /api/v1/user/list
pub async fn list_users(
    State(state): State<AppState>,
    Query(paging): Query<PageParams>,
) -> AppResult<Json<ApiResponse<Page<UserResponse>>>> {
    let users = UserRepo::list(&state.pool, paging.offset(), paging.size()).await?;
    let total = UserRepo::count(&state.pool).await?;

    Ok(ok(Page {
        list: users.iter().map(UserResponse::from).collect(),
        total,
        page: paging.page(),
        size: paging.size(),
    }))
}

/// PUT /api/v1/user/update
pub async fn update_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    input.validate()?;

    let account = non_empty(input.account);
    if let Some(account) = &account {
        ensure_account_free(&state, account, Some(input.id)).await?;
    }

    let update = UpdateUser {
        name: non_empty(input.name),
        account,
        password_hash: hash_optional_password(non_empty(input.password))?,
        role: input.role,
        private_key: None,
    };
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let user = UserRepo::update(&state.pool, input.id, &update)
        .await
        .map_err(|e| account_conflict(e, update.account.as_deref()))?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: input.id,
        })?;

    tracing::info!(admin_id = admin.user_id, user_id = user.id, "User updated");
    Ok(ok(UserResponse::from(&user)))
}

/// DELETE /api/v1/user/delete/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "User", id }.into());
    }
    tracing::info!(admin_id = admin.user_id, user_id = id, "User deleted");
    Ok(ok(()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid account or password".into(),
    ))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn hash_optional_password(password: Option<String>) -> AppResult<Option<String>> {
    password
        .map(|password| {
            validate_password_strength(&password)?;
            hash_password(&password)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
        })
        .transpose()
}

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "User", id }.into())
}

/// Fail with 409 if `account` belongs to a user other than `except`.
async fn ensure_account_free(state: &AppState, account: &str, except: Option<DbId>) -> AppResult<()> {
    match UserRepo::find_by_account(&state.pool, account).await? {
        Some(existing) if Some(existing.id) != except => Err(CoreError::Conflict(format!(
            "Account '{account}' is already taken"
        ))
        .into()),
        _ => Ok(()),
    }
}

/// Turn a unique violation on `users.account` into a 409 with a readable message.
fn account_conflict(err: sqlx::Error, account: Option<&str>) -> AppError {
    if coupon_db::is_unique_violation(&err) {
        let account = account.unwrap_or_default();
        return CoreError::Conflict(format!("Account '{account}' is already taken")).into();
    }
    err.into()
}

async fn create_user(
    state: &AppState,
    name: String,
    account: String,
    password: &str,
    role: RoleMask,
) -> AppResult<User> {
    validate_password_strength(password)?;
    ensure_account_free(state, &account, None).await?;

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        name,
        account,
        password_hash,
        role,
    };
    UserRepo::create(&state.pool, &input)
        .await
        .map_err(|e| account_conflict(e, Some(&input.account)))
}
