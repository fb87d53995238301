use serde::{Deserialize, Serialize};

/// Request body for creating or updating a user
///
/// The same shape serves `POST /api/user` and `PUT /api/user/{id}`. An
/// empty `password` on update is forwarded as-is; what it means is up to
/// the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Full name
    pub fullname: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// User record returned by the API
///
/// `user_id` and `created_at` are server-assigned; the client never sets
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier, immutable once assigned
    pub user_id: i64,
    /// Full name
    pub fullname: String,
    /// Email address
    pub email: String,
    /// ISO 8601 creation timestamp
    pub created_at: String,
}

/// Plain acknowledgement body, e.g. after a delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable acknowledgement
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_serde_roundtrip() {
        let user = NewUser {
            fullname: "Grace Hopper".to_string(),
            email: "grace@pipol.test".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        let deserialized: NewUser = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.fullname, "Grace Hopper");
        assert_eq!(deserialized.email, "grace@pipol.test");
        assert_eq!(deserialized.password, "secret");
    }

    #[test]
    fn test_user_record_from_backend_json() {
        let json = r#"{
            "user_id": 7,
            "fullname": "Grace Hopper",
            "email": "grace@pipol.test",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.user_id, 7);
        assert_eq!(record.fullname, "Grace Hopper");
        assert_eq!(record.created_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_user_record_ignores_unknown_fields() {
        let json = r#"{
            "user_id": 7,
            "fullname": "Grace Hopper",
            "email": "grace@pipol.test",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-06-01T00:00:00Z"
        }"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.user_id, 7);
    }

    #[test]
    fn test_user_record_list() {
        let json = r#"[
            {"user_id": 1, "fullname": "A", "email": "a@pipol.test", "created_at": "2024-01-01T00:00:00Z"},
            {"user_id": 2, "fullname": "B", "email": "b@pipol.test", "created_at": "2024-01-02T00:00:00Z"}
        ]"#;
        let records: Vec<UserRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user_id, 1);
        assert_eq!(records[1].user_id, 2);
    }

    #[test]
    fn test_message_response_serde() {
        let json = r#"{"message": "User deleted successfully"}"#;
        let resp: MessageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.message, "User deleted successfully");
    }
}
