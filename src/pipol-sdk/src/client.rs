use pipol_api::ApiErrorBody;
use reqwest::{Response, StatusCode};
use tracing::debug;

use crate::error::ClientError;
use crate::session::SessionStore;

/// HTTP client for the PIPOL API
///
/// The session token is read from the [`SessionStore`] before every
/// request, so a login or logout through any other handle on the same
/// store takes effect on the very next call.
pub struct PipolClient {
    base_url: String,
    session: SessionStore,
    http: reqwest::Client,
}

impl PipolClient {
    /// Create a new client pointing at the given base URL
    pub fn new(base_url: &str, session: SessionStore) -> Self {
        Self::new_with_client(base_url, session, reqwest::Client::new())
    }

    /// Create a client with a caller-supplied `reqwest::Client`
    pub fn new_with_client(base_url: &str, session: SessionStore, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            http,
        }
    }

    /// Session store backing this client
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Attach the stored session token, if any, as a bearer credential
    async fn attach_token(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        match self.session.load().await? {
            Some(token) => Ok(req.bearer_auth(token)),
            None => Ok(req),
        }
    }

    /// Send a POST request with a JSON body and return the raw response
    pub(crate) async fn send_post<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "POST");
        let req = self.http.post(&url).json(body);
        Ok(self.attach_token(req).await?.send().await?)
    }

    /// Send a GET request and deserialize the response
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "GET");
        let req = self.http.get(&url);
        let resp = self.attach_token(req).await?.send().await?;
        handle_response(resp).await
    }

    /// Send a POST request with a JSON body and deserialize the response
    pub(crate) async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self.send_post(path, body).await?;
        handle_response(resp).await
    }

    /// Send a PUT request with a JSON body and deserialize the response
    pub(crate) async fn put<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "PUT");
        let req = self.http.put(&url).json(body);
        let resp = self.attach_token(req).await?.send().await?;
        handle_response(resp).await
    }

    /// Send a DELETE request, expecting no useful response body
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "DELETE");
        let req = self.http.delete(&url);
        let resp = self.attach_token(req).await?.send().await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            Err(error_from_failure(status, text))
        }
    }
}

pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: Response,
) -> Result<T, ClientError> {
    if resp.status().is_success() {
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    } else {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Err(error_from_failure(status, text))
    }
}

/// Map a failure response to an error
///
/// A 422 carrying a field map is a validation failure and a 404 is
/// not-found. Everything else keeps its status and a best-effort message:
/// the body `message`, the raw body text, or the status reason phrase.
pub(crate) fn error_from_failure(status: StatusCode, text: String) -> ClientError {
    let body = serde_json::from_str::<ApiErrorBody>(&text).unwrap_or_default();

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Some(errors) = body.errors {
            return ClientError::Validation(errors);
        }
    }

    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text.trim().to_string()
            }
        });

    if status == StatusCode::NOT_FOUND {
        ClientError::NotFound(message)
    } else {
        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Best-effort failure message from an auth endpoint response
pub(crate) async fn auth_failure_message(resp: Response, fallback: &str) -> String {
    let text = resp.text().await.unwrap_or_default();
    serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_422_with_field_map_is_validation() {
        let err = error_from_failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors": {"email": "The email has already been taken."}}"#.to_string(),
        );
        match err {
            ClientError::Validation(errors) => {
                assert_eq!(errors.get("email"), Some("The email has already been taken."));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_422_without_field_map_keeps_status() {
        let err = error_from_failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "Unprocessable"}"#.to_string(),
        );
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Unprocessable");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_404_is_not_found() {
        let err = error_from_failure(
            StatusCode::NOT_FOUND,
            r#"{"message": "User not found"}"#.to_string(),
        );
        match err {
            ClientError::NotFound(message) => assert_eq!(message, "User not found"),
            other => panic!("expected not-found error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_falls_back_to_reason_phrase() {
        let err = error_from_failure(StatusCode::INTERNAL_SERVER_ERROR, String::new());
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_is_kept_verbatim() {
        let err = error_from_failure(StatusCode::BAD_GATEWAY, "upstream unreachable\n".to_string());
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream unreachable");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_401_on_guarded_route_keeps_status() {
        let err = error_from_failure(
            StatusCode::UNAUTHORIZED,
            r#"{"message": "Unauthenticated"}"#.to_string(),
        );
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthenticated");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }
}
