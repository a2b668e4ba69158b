pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
