use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yodahunters::auth::Secret;
use yodahunters::config::{Cli, Config};
use yodahunters::state::AppState;
use yodahunters::{app, db};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "yodahunters=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_cli(Cli::parse());

  let pool = db::init_db(&config.database_path).expect("Failed to initialize database");

  // A new key per process: restarting logs everyone out
  let secret = Secret::generate().expect("Failed to generate token signing key");

  if config.devmode {
    tracing::warn!("Dev mode is enabled, static assets are served with caching disabled.");
  }

  let state = AppState::new(pool, Arc::new(secret), config.devmode);
  let app = app::router(state, &config.static_dir);

  let listener = tokio::net::TcpListener::bind(&config.address)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", config.address));

  tracing::info!("Serving site at {:?}", config.address);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
