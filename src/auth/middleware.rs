//! Authorization middleware and the current-user extractor.
//!
//! The middleware runs before the wrapped handler: it reads the
//! `access_token` cookie, parses and validates the token, and either
//! redirects to the login page (302) or stores a [`CurrentUser`] in the
//! request extensions. Handlers read it back with the `CurrentUser`
//! extractor. The handler's own `Result` is translated to a response by
//! [`ServerError`](crate::error::ServerError), so error translation only
//! ever wraps the business logic, never the check itself.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use axum_extra::extract::CookieJar;
use std::fmt;

use super::secret::{Secret, SharedSecret};
use super::token::{self, TokenError};
use crate::config::{ACCESS_TOKEN_COOKIE, LOGIN_PATH};

/// Identity of an authenticated request.
/// Add this as a handler parameter on a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
}

/// Why a request was not authorized. Only ever logged.
#[derive(Debug)]
pub enum AuthFailure {
    MissingCookie,
    Token(TokenError),
    Invalid,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::MissingCookie => write!(f, "no {} cookie", ACCESS_TOKEN_COOKIE),
            AuthFailure::Token(err) => write!(f, "{}", err),
            AuthFailure::Invalid => write!(f, "token signature or expiry invalid"),
        }
    }
}

/// Check the request cookies for a valid access token.
pub fn authorize(jar: &CookieJar, secret: &Secret) -> Result<CurrentUser, AuthFailure> {
    let cookie = jar
        .get(ACCESS_TOKEN_COOKIE)
        .ok_or(AuthFailure::MissingCookie)?;

    let token = token::parse(cookie.value()).map_err(AuthFailure::Token)?;
    match token.is_valid(secret) {
        Ok(true) => Ok(CurrentUser {
            user_id: token.payload.user_id,
        }),
        Ok(false) => Err(AuthFailure::Invalid),
        Err(err) => Err(AuthFailure::Token(err)),
    }
}

/// 302 to the login page.
pub fn login_redirect() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, LOGIN_PATH)]).into_response()
}

/// Middleware: reject unauthenticated requests, otherwise attach the
/// [`CurrentUser`] and call the wrapped handler.
pub async fn require_auth(
    State(secret): State<SharedSecret>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize(&jar, &secret) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(reason) => {
            tracing::debug!(
                "Redirecting {} {} to {}: {}",
                request.method(),
                request.uri().path(),
                LOGIN_PATH,
                reason
            );
            login_redirect()
        }
    }
}

/// Wrap a route's handlers so they only run for authenticated requests.
pub fn protect<S>(route: MethodRouter<S>, secret: &SharedSecret) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(secret.clone(), require_auth))
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present when the route is wrapped by `protect`
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or_else(login_redirect)
    }
}
