//! Authentication handlers for register, login, logout and the current user.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;

use super::middleware::CurrentUser;
use super::{password, token};
use crate::config::{ACCESS_TOKEN_COOKIE, TOKEN_LIFETIME_HOURS};
use crate::db::{self, users};
use crate::domain::{LoginRequest, RegisterRequest, User};
use crate::error::ServerError;
use crate::state::AppState;

/// Response body of a successful login
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// POST /api/register - Create an account
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterRequest>,
) -> Result<Json<User>, ServerError> {
    form.validate().map_err(ServerError::bad_request)?;
    let username = form.username.trim();
    let email = form.email.trim();

    // Hash before taking the lock, argon2 is deliberately slow
    let pw_hash = password::hash_password(&form.password)?;

    let conn = db::try_lock(&state.db)?;
    if users::username_exists(&conn, username)? {
        return Err(ServerError::conflict(format!(
            "user with username: {} already exists",
            username
        )));
    }
    if users::email_exists(&conn, email)? {
        return Err(ServerError::conflict("email is already registered"));
    }

    let user = users::create_user(&conn, username, email, &pw_hash)?;
    tracing::info!("Registered user {} (id {})", user.username, user.id);
    Ok(Json(user))
}

/// POST /api/login - Verify credentials and issue the access token cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AccessTokenResponse>), ServerError> {
    let credentials = {
        let conn = db::try_lock(&state.db)?;
        users::get_credentials_by_username(&conn, form.username.trim())?
    };

    // Same answer for unknown users and wrong passwords
    let Some((user_id, pw_hash)) = credentials else {
        return Err(ServerError::unauthorized("invalid username or password"));
    };
    if !password::verify_password(&form.password, &pw_hash) {
        return Err(ServerError::unauthorized("invalid username or password"));
    }

    let token = token::generate(user_id, &state.secret)?;
    tracing::debug!("Issued access token for user {}", user_id);

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token.raw.clone()))
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(time::Duration::hours(TOKEN_LIFETIME_HOURS))
        .expires(time::OffsetDateTime::now_utc() + time::Duration::hours(TOKEN_LIFETIME_HOURS))
        .build();

    Ok((
        jar.add(cookie),
        Json(AccessTokenResponse {
            access_token: token.raw,
        }),
    ))
}

/// POST /api/logout - Clear the access token cookie.
/// Tokens are stateless, so one copied elsewhere stays valid until it expires.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

/// GET /api/me - The authenticated user
pub async fn me(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<User>, ServerError> {
    let conn = db::try_lock(&state.db)?;
    users::get_user_by_id(&conn, user.user_id)?
        .map(Json)
        .ok_or_else(|| ServerError::not_found("user not found"))
}
