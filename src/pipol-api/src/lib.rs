mod types;

pub use types::auth::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse};
pub use types::error::{ApiErrorBody, ValidationErrors};
pub use types::users::{MessageResponse, NewUser, UserRecord};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
