use pipol_api::{NewUser, UserRecord};

use crate::client::PipolClient;
use crate::error::ClientError;

impl PipolClient {
    // ── User operations ────────────────────────────────────────────

    /// List all users, in the order the server returns them
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, ClientError> {
        self.get("/api/user").await
    }

    /// Get a user by id
    pub async fn get_user(&self, id: i64) -> Result<UserRecord, ClientError> {
        self.get(&format!("/api/user/{id}")).await
    }

    /// Create a new user
    pub async fn create_user(&self, user: NewUser) -> Result<UserRecord, ClientError> {
        self.post("/api/user", &user).await
    }

    /// Update a user
    ///
    /// An empty password is submitted as-is; whether it means "keep the
    /// current password" is the backend's call.
    pub async fn update_user(&self, id: i64, user: NewUser) -> Result<UserRecord, ClientError> {
        self.put(&format!("/api/user/{id}"), &user).await
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("/api/user/{id}")).await
    }
}
