//! Authentication: signed access tokens, password hashing, and the
//! middleware that guards protected routes.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod secret;
pub mod token;

pub use handlers::*;
pub use middleware::{protect, require_auth, CurrentUser};
pub use secret::{Secret, SharedSecret};
pub use token::{Token, TokenError};
