//! Token signing secret.

use rand_core::{OsRng, RngCore};
use std::fmt;
use std::sync::Arc;

use crate::config::SECRET_LEN;

/// Secret shared between the router, the middleware and the login handler.
pub type SharedSecret = Arc<Secret>;

/// Symmetric HMAC key, generated at startup and only ever held in memory.
///
/// Restarting the process generates a new key, which invalidates every
/// token issued by the previous one.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret([u8; SECRET_LEN]);

impl Secret {
    /// Generate a fresh key from the OS random source.
    pub fn generate() -> Result<Self, rand_core::Error> {
        let mut key = [0u8; SECRET_LEN];
        OsRng.try_fill_bytes(&mut key)?;
        Ok(Self(key))
    }

    pub fn from_bytes(key: [u8; SECRET_LEN]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}
