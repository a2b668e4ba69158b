//! Route table.
//!
//! Protected routes are wrapped individually with [`auth::protect`]; public
//! and protected handlers may share a path (e.g. GET and POST /api/threads).
//! Unrouted paths are protected too: without a session they redirect to the
//! login page, with one they are a 404.

use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, protect};
use crate::handlers;
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let secret = state.secret.clone();

    let api = Router::new()
        .route(
            "/threads",
            get(handlers::list_threads).merge(protect(post(handlers::create_thread), &secret)),
        )
        .route("/threads/{id}", get(handlers::get_thread))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", protect(get(auth::me), &secret));

    let assets = Router::new().nest_service("/static", ServeDir::new(static_dir));
    let assets = if state.devmode {
        assets.layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
    } else {
        assets
    };

    let not_found = Router::new()
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(secret.clone(), auth::require_auth));

    Router::new()
        .route("/", protect(get(handlers::home), &secret))
        .route("/login", get(handlers::login_page))
        .nest("/api", api)
        .merge(assets)
        .fallback_service(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
