//! In-process stub of the PIPOL backend.
//!
//! Implements the wire contract of the real server on a random local port
//! and records the `Authorization` header of every request it receives, so
//! tests can assert what the client actually sent.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tokio::task::JoinHandle;

use crate::{
    ApiErrorBody, AuthResponse, LoginRequest, MessageResponse, NewUser, RegisterRequest,
    RegisterResponse, UserRecord, ValidationErrors,
};

/// Builder for a stub PIPOL backend
///
/// Seeded users can log in with their password and show up in the user
/// listing. All guarded routes accept exactly one bearer token, the one
/// configured with [`StubBackend::with_token`].
pub struct StubBackend {
    token: String,
    register_token: Option<String>,
    seeds: Vec<(String, String, String)>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            token: "stub-session-token".to_string(),
            register_token: None,
            seeds: Vec::new(),
        }
    }

    /// Set the session token issued by login and required on guarded routes
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Make registration responses carry a token, as some deployments do
    pub fn with_register_token(mut self, token: impl Into<String>) -> Self {
        self.register_token = Some(token.into());
        self
    }

    /// Seed a user account that exists before the server starts
    pub fn with_user(
        mut self,
        fullname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.seeds
            .push((fullname.into(), email.into(), password.into()));
        self
    }

    /// Bind a random local port and serve the stub until the returned
    /// [`StubServer`] is dropped
    pub async fn spawn(self) -> StubServer {
        let next_id = AtomicI64::new(self.seeds.len() as i64 + 1);
        let users = self
            .seeds
            .into_iter()
            .enumerate()
            .map(|(i, (fullname, email, password))| StubUser {
                record: UserRecord {
                    user_id: i as i64 + 1,
                    fullname,
                    email,
                    created_at: Utc::now().to_rfc3339(),
                },
                password,
            })
            .collect();

        let state = Arc::new(StubState {
            token: self.token,
            register_token: self.register_token,
            users: Mutex::new(users),
            current: Mutex::new(None),
            next_id,
            seen_auth: Mutex::new(Vec::new()),
        });

        let recorder = state.clone();
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/me", get(me))
            .route("/api/user", get(list_users).post(create_user))
            .route(
                "/api/user/:id",
                get(get_user).put(update_user).delete(delete_user),
            )
            .layer(middleware::from_fn(move |req, next| {
                record_authorization(recorder.clone(), req, next)
            }))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub backend listener");
        let addr = listener
            .local_addr()
            .expect("stub backend has no local addr");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        StubServer {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Running stub backend
///
/// Dropping the server aborts the serve task and frees the port.
pub struct StubServer {
    base_url: String,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Base URL of the stub, e.g. `http://127.0.0.1:49152`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Authorization` header values in request order, `None` where a
    /// request carried no header
    pub fn seen_authorization(&self) -> Vec<Option<String>> {
        self.state.seen_auth.lock().unwrap().clone()
    }

    /// Current user records in insertion order
    pub fn users(&self) -> Vec<UserRecord> {
        self.state
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.record.clone())
            .collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct StubUser {
    record: UserRecord,
    password: String,
}

struct StubState {
    token: String,
    register_token: Option<String>,
    users: Mutex<Vec<StubUser>>,
    /// Account id of the last successful login, served by `/api/auth/me`
    current: Mutex<Option<i64>>,
    next_id: AtomicI64,
    seen_auth: Mutex<Vec<Option<String>>>,
}

/// Record the Authorization header of every request before routing it
async fn record_authorization(state: Arc<StubState>, request: Request, next: Next) -> Response {
    let auth = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    state.seen_auth.lock().unwrap().push(auth);
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiErrorBody::message("Unauthenticated")),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiErrorBody::message("User not found")),
    )
        .into_response()
}

fn required_field_errors(fullname: &str, email: &str, password: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if fullname.trim().is_empty() {
        errors.insert("fullname", "The fullname field is required.");
    }
    if email.trim().is_empty() {
        errors.insert("email", "The email field is required.");
    }
    if let Some(password) = password {
        if password.trim().is_empty() {
            errors.insert("password", "The password field is required.");
        }
    }
    errors
}

async fn login(
    State(state): State<Arc<StubState>>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    let users = state.users.lock().unwrap();
    let found = users
        .iter()
        .find(|u| u.record.email == request.email && u.password == request.password);
    match found {
        Some(user) => {
            *state.current.lock().unwrap() = Some(user.record.user_id);
            (
                StatusCode::OK,
                Json(AuthResponse {
                    token: state.token.clone(),
                    fullname: Some(user.record.fullname.clone()),
                }),
            )
                .into_response()
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ApiErrorBody::message("Invalid credentials")),
        )
            .into_response(),
    }
}

async fn register(
    State(state): State<Arc<StubState>>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    let errors = required_field_errors(&request.fullname, &request.email, Some(&request.password));
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiErrorBody::validation(errors)),
        )
            .into_response();
    }

    let mut users = state.users.lock().unwrap();
    if users.iter().any(|u| u.record.email == request.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorBody::message("Email already registered")),
        )
            .into_response();
    }

    let record = UserRecord {
        user_id: state.next_id.fetch_add(1, Ordering::SeqCst),
        fullname: request.fullname,
        email: request.email,
        created_at: Utc::now().to_rfc3339(),
    };
    users.push(StubUser {
        record,
        password: request.password,
    });

    (
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: Some("User registered successfully".to_string()),
            token: state.register_token.clone(),
        }),
    )
        .into_response()
}

async fn me(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    if bearer(&headers).as_deref() != Some(state.token.as_str()) {
        return unauthorized();
    }
    let current = *state.current.lock().unwrap();
    let users = state.users.lock().unwrap();
    let found = current.and_then(|id| users.iter().find(|u| u.record.user_id == id));
    match found {
        Some(user) => (StatusCode::OK, Json(user.record.clone())).into_response(),
        None => not_found(),
    }
}

async fn list_users(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    if bearer(&headers).as_deref() != Some(state.token.as_str()) {
        return unauthorized();
    }
    let users = state.users.lock().unwrap();
    let records: Vec<UserRecord> = users.iter().map(|u| u.record.clone()).collect();
    (StatusCode::OK, Json(records)).into_response()
}

async fn create_user(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(request): Json<NewUser>,
) -> impl IntoResponse {
    if bearer(&headers).as_deref() != Some(state.token.as_str()) {
        return unauthorized();
    }

    let errors = required_field_errors(&request.fullname, &request.email, Some(&request.password));
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiErrorBody::validation(errors)),
        )
            .into_response();
    }

    let mut users = state.users.lock().unwrap();
    if users.iter().any(|u| u.record.email == request.email) {
        let mut errors = ValidationErrors::new();
        errors.insert("email", "The email has already been taken.");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiErrorBody::validation(errors)),
        )
            .into_response();
    }

    let record = UserRecord {
        user_id: state.next_id.fetch_add(1, Ordering::SeqCst),
        fullname: request.fullname,
        email: request.email,
        created_at: Utc::now().to_rfc3339(),
    };
    users.push(StubUser {
        record: record.clone(),
        password: request.password,
    });

    (StatusCode::CREATED, Json(record)).into_response()
}

async fn get_user(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if bearer(&headers).as_deref() != Some(state.token.as_str()) {
        return unauthorized();
    }
    let users = state.users.lock().unwrap();
    match users.iter().find(|u| u.record.user_id == id) {
        Some(user) => (StatusCode::OK, Json(user.record.clone())).into_response(),
        None => not_found(),
    }
}

async fn update_user(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<NewUser>,
) -> impl IntoResponse {
    if bearer(&headers).as_deref() != Some(state.token.as_str()) {
        return unauthorized();
    }

    let mut users = state.users.lock().unwrap();
    let Some(pos) = users.iter().position(|u| u.record.user_id == id) else {
        return not_found();
    };

    // Password is optional on update, an empty value keeps the old one
    let errors = required_field_errors(&request.fullname, &request.email, None);
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiErrorBody::validation(errors)),
        )
            .into_response();
    }
    if users
        .iter()
        .any(|u| u.record.user_id != id && u.record.email == request.email)
    {
        let mut errors = ValidationErrors::new();
        errors.insert("email", "The email has already been taken.");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiErrorBody::validation(errors)),
        )
            .into_response();
    }

    let user = &mut users[pos];
    user.record.fullname = request.fullname;
    user.record.email = request.email;
    if !request.password.is_empty() {
        user.password = request.password;
    }

    (StatusCode::OK, Json(user.record.clone())).into_response()
}

async fn delete_user(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if bearer(&headers).as_deref() != Some(state.token.as_str()) {
        return unauthorized();
    }

    let mut users = state.users.lock().unwrap();
    let Some(pos) = users.iter().position(|u| u.record.user_id == id) else {
        return not_found();
    };
    users.remove(pos);

    let mut current = state.current.lock().unwrap();
    if *current == Some(id) {
        *current = None;
    }

    (
        StatusCode::OK,
        Json(MessageResponse {
            message: "User deleted successfully".to_string(),
        }),
    )
        .into_response()
}
