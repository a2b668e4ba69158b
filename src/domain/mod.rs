pub mod thread;
pub mod user;

pub use thread::{NewThread, Thread};
pub use user::{LoginRequest, RegisterRequest, User};
