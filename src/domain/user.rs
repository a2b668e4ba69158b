use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user as returned by the API. The password hash never
/// leaves the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub email: String,
  pub created_at: DateTime<Utc>,
}

/// Body of POST /api/register
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
  pub username: String,
  pub email: String,
  pub password: String,
}

impl RegisterRequest {
  /// Returns the first problem with the request, if any.
  pub fn validate(&self) -> Result<(), &'static str> {
    if self.username.trim().is_empty() {
      return Err("username is required");
    }
    if self.email.trim().is_empty() {
      return Err("email is required");
    }
    if !self.email.contains('@') {
      return Err("email is invalid");
    }
    if self.password.is_empty() {
      return Err("password is required");
    }
    Ok(())
  }
}

/// Body of POST /api/login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
  pub username: String,
  pub password: String,
}
