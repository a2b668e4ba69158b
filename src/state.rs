//! Application state shared by all handlers.

use crate::auth::SharedSecret;
use crate::db::DbPool;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared database connection (users, threads)
    pub db: DbPool,

    /// Token signing secret, generated at startup
    pub secret: SharedSecret,

    pub devmode: bool,
}

impl AppState {
    pub fn new(db: DbPool, secret: SharedSecret, devmode: bool) -> Self {
        Self {
            db,
            secret,
            devmode,
        }
    }
}
