//! Thread API handlers.

use axum::{
  extract::{Path, State},
  Json,
};

use crate::auth::CurrentUser;
use crate::db::{self, threads};
use crate::domain::{NewThread, Thread};
use crate::error::ServerError;
use crate::state::AppState;

/// GET /api/threads
pub async fn list_threads(State(state): State<AppState>) -> Result<Json<Vec<Thread>>, ServerError> {
  let conn = db::try_lock(&state.db)?;
  Ok(Json(threads::list_threads(&conn)?))
}

/// GET /api/threads/{id}
pub async fn get_thread(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Thread>, ServerError> {
  let id: i64 = id
    .parse()
    .map_err(|_| ServerError::bad_request(format!("invalid thread ID {:?}", id)))?;

  let conn = db::try_lock(&state.db)?;
  threads::get_thread(&conn, id)?
    .map(Json)
    .ok_or_else(|| ServerError::not_found(format!("thread {} not found", id)))
}

/// POST /api/threads (protected) - the author is the authenticated user
pub async fn create_thread(
  user: CurrentUser,
  State(state): State<AppState>,
  Json(form): Json<NewThread>,
) -> Result<Json<Thread>, ServerError> {
  form.validate().map_err(ServerError::bad_request)?;

  let conn = db::try_lock(&state.db)?;
  let thread = threads::create_thread(&conn, user.user_id, form.title.trim(), &form.body)?;
  tracing::info!("User {} created thread {}", user.user_id, thread.id);
  Ok(Json(thread))
}
