mod auth;
mod client;
mod error;
mod session;
mod users;

pub use client::PipolClient;
pub use error::ClientError;
pub use session::{SessionError, SessionStore};

// Re-export API types for convenience
pub use pipol_api;
