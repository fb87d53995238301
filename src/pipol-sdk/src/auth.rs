use pipol_api::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, UserRecord};
use tracing::info;

use crate::client::{PipolClient, auth_failure_message, handle_response};
use crate::error::ClientError;

impl PipolClient {
    // ── Session operations ─────────────────────────────────────────

    /// Log in and persist the session token
    ///
    /// On success the returned token replaces whatever the session store
    /// held before. A rejected login leaves the stored session untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self.send_post("/api/auth/login", &req).await?;
        if !resp.status().is_success() {
            let message = auth_failure_message(resp, "Invalid email or password").await;
            return Err(ClientError::Auth(message));
        }
        let auth: AuthResponse = handle_response(resp).await?;
        self.session().save(&auth.token).await?;
        info!(email, "logged in");
        Ok(auth)
    }

    /// Register a new account
    ///
    /// The session store is not touched. Some deployments return a token
    /// in the response; it is passed through for the caller to use, but
    /// the normal flow is an explicit login afterwards.
    pub async fn register(
        &self,
        fullname: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, ClientError> {
        let req = RegisterRequest {
            fullname: fullname.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self.send_post("/api/auth/register", &req).await?;
        if !resp.status().is_success() {
            let message = auth_failure_message(resp, "An error occurred").await;
            return Err(ClientError::Auth(message));
        }
        handle_response(resp).await
    }

    /// Fetch the account record of the authenticated session
    pub async fn me(&self) -> Result<UserRecord, ClientError> {
        self.get("/api/auth/me").await
    }

    /// Drop the persisted session
    ///
    /// Clearing an already-empty session is a no-op. The server is not
    /// told; the token simply stops being attached to requests.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.session().clear().await?;
        info!("logged out");
        Ok(())
    }
}
