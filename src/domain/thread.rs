use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length, matching the column constraint
pub const MAX_TITLE_LEN: usize = 100;

/// A forum thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
  pub id: i64,
  pub author_id: i64,
  pub title: String,
  pub body: String,
  pub created_at: DateTime<Utc>,
}

/// Body of POST /api/threads. The author comes from the access token,
/// never from the request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewThread {
  pub title: String,
  pub body: String,
}

impl NewThread {
  pub fn validate(&self) -> Result<(), &'static str> {
    if self.title.trim().is_empty() {
      return Err("title is required");
    }
    if self.title.chars().count() > MAX_TITLE_LEN {
      return Err("title is too long");
    }
    if self.body.trim().is_empty() {
      return Err("body is required");
    }
    Ok(())
  }
}
