//! Test utilities for building application state.
//!
//! Provides an in-memory database with the authoritative schema and a fixed
//! signing secret, so handler tests can mint tokens the server accepts.

use rusqlite::Result;
use std::sync::Arc;

use crate::auth::{token, Secret, SharedSecret, Token};
use crate::config::SECRET_LEN;
use crate::db::{self, users, DbPool};
use crate::state::AppState;

/// Key used by [`TestEnv`]; any token signed with it is accepted.
pub const TEST_SECRET: [u8; SECRET_LEN] = [0x42; SECRET_LEN];

/// Application state backed by an in-memory database.
pub struct TestEnv {
    pub db: DbPool,
    pub secret: SharedSecret,
}

impl TestEnv {
    /// Create a test environment with the full schema and no rows.
    pub fn new() -> Result<Self> {
        Ok(Self {
            db: db::init_memory_db()?,
            secret: Arc::new(Secret::from_bytes(TEST_SECRET)),
        })
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.db.clone(), self.secret.clone(), false)
    }

    /// Insert a user directly (bypassing password hashing) and return its id.
    pub fn create_user(&self, username: &str) -> Result<i64> {
        let conn = self.db.lock().map_err(|_| rusqlite::Error::InvalidQuery)?;
        let email = format!("{}@example.com", username);
        Ok(users::create_user(&conn, username, &email, "not-a-real-hash")?.id)
    }

    /// A valid access token for `user_id`.
    pub fn token_for(&self, user_id: i64) -> Token {
        match token::generate(user_id, &self.secret) {
            Ok(token) => token,
            Err(e) => panic!("failed to generate test token: {}", e),
        }
    }
}
