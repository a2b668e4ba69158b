pub mod threads;

use askama::Template;
use axum::{extract::State, response::Html};

use crate::auth::CurrentUser;
use crate::db::{self, users};
use crate::error::ServerError;
use crate::filters;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
  pub username: String,
  pub thread_count: usize,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
  pub version: &'static str,
}

/// GET / - Home page (protected)
pub async fn home(
  user: CurrentUser,
  State(state): State<AppState>,
) -> Result<Html<String>, ServerError> {
  let (username, thread_count) = {
    let conn = db::try_lock(&state.db)?;
    let username = users::get_user_by_id(&conn, user.user_id)?
      .map(|u| u.username)
      .ok_or_else(|| ServerError::not_found("user not found"))?;
    (username, db::threads::list_threads(&conn)?.len())
  };

  let template = HomeTemplate {
    username,
    thread_count,
  };
  Ok(Html(template.render()?))
}

/// GET /login - Login and registration page
pub async fn login_page() -> Result<Html<String>, ServerError> {
  let template = LoginTemplate {
    version: env!("CARGO_PKG_VERSION"),
  };
  Ok(Html(template.render()?))
}

/// Fallback for unrouted paths, reached only once authorized
pub async fn not_found() -> ServerError {
  ServerError::not_found("page not found")
}

pub use threads::{create_thread, get_thread, list_threads};
