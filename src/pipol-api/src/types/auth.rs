use serde::{Deserialize, Serialize};

/// Request body for `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// Full name of the signed-in account, when the server includes it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
}

/// Request body for `POST /api/auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Full name of the new account
    pub fullname: String,
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Successful registration response
///
/// Both fields are best-effort: deployed backends differ on whether a
/// message, a token, or neither comes back. Callers must not rely on
/// `token` being present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Human-readable acknowledgement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Token, when the server chooses to return one on registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_serde_roundtrip() {
        let req = LoginRequest {
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_string(&req).unwrap();
        let deserialized: LoginRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.email, "a@b.com");
        assert_eq!(deserialized.password, "secret");
    }

    #[test]
    fn test_auth_response_with_fullname() {
        let json = r#"{"token": "T1", "fullname": "Ada Lovelace"}"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "T1");
        assert_eq!(resp.fullname, Some("Ada Lovelace".to_string()));
    }

    #[test]
    fn test_auth_response_token_only() {
        let json = r#"{"token": "T1"}"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "T1");
        assert_eq!(resp.fullname, None);
    }

    #[test]
    fn test_auth_response_omits_absent_fullname() {
        let resp = AuthResponse {
            token: "T1".to_string(),
            fullname: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"token":"T1"}"#);
    }

    #[test]
    fn test_register_request_serde_roundtrip() {
        let req = RegisterRequest {
            fullname: "Ada Lovelace".to_string(),
            email: "ada@pipol.test".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_string(&req).unwrap();
        let deserialized: RegisterRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.fullname, "Ada Lovelace");
        assert_eq!(deserialized.email, "ada@pipol.test");
    }

    #[test]
    fn test_register_response_message_only() {
        let json = r#"{"message": "User registered successfully"}"#;
        let resp: RegisterResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.message.as_deref(), Some("User registered successfully"));
        assert_eq!(resp.token, None);
    }

    #[test]
    fn test_register_response_empty_body() {
        let resp: RegisterResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.message, None);
        assert_eq!(resp.token, None);
    }
}
