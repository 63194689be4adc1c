//! In-process mock of the attendance backend, served on an ephemeral port.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rollcall::rollcall_config::{ApiConfig, AppConfig, QueryConfig};
use rollcall::rollcall_core::{MemoryStateStorage, RecordingNotifier};
use rollcall::state::AppContext;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "password123";

pub struct Backend {
    /// Bearer token the backend currently accepts.
    pub valid_token: String,
    pub refresh_token: String,
    pub refresh_enabled: bool,
    pub issued: usize,
    pub departments: Vec<Value>,
    pub used_qr_codes: HashSet<String>,
    pub hits: HashMap<String, usize>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            valid_token: "token-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            refresh_enabled: true,
            issued: 1,
            departments: Vec::new(),
            used_qr_codes: HashSet::new(),
            hits: HashMap::new(),
        }
    }
}

pub type Shared = Arc<Mutex<Backend>>;

pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(Backend::default()));

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/refresh", post(refresh))
            .route("/api/auth/profile", get(profile))
            .route("/api/departments", get(list_departments).post(create_department))
            .route("/api/departments/{id}", get(get_department))
            .route("/api/sessions/{id}/attendance-status", get(attendance_status))
            .route("/api/attendance/mark-qr", post(mark_qr))
            .fallback(not_found)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            api: ApiConfig {
                base_url: self.base_url.clone(),
                timeout: Duration::from_secs(5),
            },
            query: QueryConfig {
                retry: 0,
                ..QueryConfig::default()
            },
            ..AppConfig::default()
        }
    }

    /// A context backed by memory storage and a recording notifier.
    pub async fn context(&self) -> (AppContext, Arc<MemoryStateStorage>, Arc<RecordingNotifier>) {
        let storage = Arc::new(MemoryStateStorage::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let ctx = AppContext::init(self.config(), storage.clone(), notifier.clone())
            .await
            .unwrap();
        (ctx, storage, notifier)
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .get(route)
            .copied()
            .unwrap_or(0)
    }

    /// Makes the backend reject the current bearer token.
    pub fn rotate_token(&self) {
        let mut backend = self.state.lock().unwrap();
        backend.issued += 1;
        backend.valid_token = format!("token-{}", backend.issued);
    }

    pub fn disable_refresh(&self) {
        self.state.lock().unwrap().refresh_enabled = false;
    }

    pub fn mark_qr_used(&self, qr_code_id: &str) {
        self.state
            .lock()
            .unwrap()
            .used_qr_codes
            .insert(qr_code_id.to_string());
    }
}

pub fn user_json(role: &str) -> Value {
    json!({
        "id": "u-1",
        "email": "ada@uni.edu",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "role": role,
        "studentId": if role == "STUDENT" { json!("S-100") } else { Value::Null },
        "employeeId": if role == "STUDENT" { Value::Null } else { json!("E-100") },
    })
}

fn record(state: &Shared, method: &Method, uri: &Uri) {
    let key = format!("{} {}", method, uri.path().trim_start_matches("/api"));
    *state.lock().unwrap().hits.entry(key).or_default() += 1;
}

fn authorized(state: &Shared, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", state.lock().unwrap().valid_token);
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid or expired token" })),
    )
        .into_response()
}

async fn login(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &method, &uri);
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }

    let role = match body["email"].as_str() {
        Some(email) if email.starts_with("admin") => "ADMIN",
        Some(email) if email.starts_with("faculty") => "FACULTY",
        _ => "STUDENT",
    };
    let backend = state.lock().unwrap();
    Json(json!({
        "data": {
            "user": user_json(role),
            "token": backend.valid_token,
            "refreshToken": backend.refresh_token,
        }
    }))
    .into_response()
}

async fn refresh(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &method, &uri);
    let mut backend = state.lock().unwrap();
    if !backend.refresh_enabled || body["refreshToken"] != backend.refresh_token.as_str() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid refresh token" })),
        )
            .into_response();
    }

    backend.issued += 1;
    backend.valid_token = format!("token-{}", backend.issued);
    Json(json!({ "data": { "token": backend.valid_token } })).into_response()
}

async fn profile(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, &method, &uri);
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    Json(json!({ "data": user_json("ADMIN") })).into_response()
}

async fn list_departments(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, &method, &uri);
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let departments = state.lock().unwrap().departments.clone();
    Json(json!({ "data": departments })).into_response()
}

async fn get_department(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    record(&state, &method, &uri);
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let found = state
        .lock()
        .unwrap()
        .departments
        .iter()
        .find(|d| d["id"] == id.as_str())
        .cloned();
    match found {
        Some(department) => Json(json!({ "data": department })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Department not found" })),
        )
            .into_response(),
    }
}

async fn create_department(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &method, &uri);
    if !authorized(&state, &headers) {
        return unauthorized();
    }

    let mut backend = state.lock().unwrap();
    if backend.departments.iter().any(|d| d["code"] == body["code"]) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Department code already exists", "field": "code" })),
        )
            .into_response();
    }

    let department = json!({
        "id": format!("d-{}", backend.departments.len() + 1),
        "name": body["name"],
        "code": body["code"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "isActive": true,
    });
    backend.departments.push(department.clone());
    (StatusCode::CREATED, Json(json!({ "data": department }))).into_response()
}

async fn mark_qr(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &method, &uri);
    if !authorized(&state, &headers) {
        return unauthorized();
    }

    let Some(qr_code_id) = body["qrCodeId"].as_str().map(str::to_string) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "qrCodeId is required" })),
        )
            .into_response();
    };
    if body["latitude"].is_null() || body["longitude"].is_null() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Location is required" })),
        )
            .into_response();
    }

    let mut backend = state.lock().unwrap();
    if !backend.used_qr_codes.insert(qr_code_id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "QR code already used" })),
        )
            .into_response();
    }

    Json(json!({
        "data": {
            "id": "a-1",
            "student": { "id": "u-1", "firstName": "Ada", "lastName": "Lovelace", "studentId": "S-100" },
            "session": {
                "id": "s-1",
                "title": "Lecture 1",
                "course": { "name": "Algorithms", "code": "CS201" }
            },
            "markedAt": "2025-03-10T09:05:00Z",
            "location": { "latitude": body["latitude"], "longitude": body["longitude"] },
            "type": "QR",
            "status": "PRESENT"
        }
    }))
    .into_response()
}

async fn attendance_status(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    record(&state, &method, &uri);
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let present = !state.lock().unwrap().used_qr_codes.is_empty();
    Json(json!({ "data": { "isPresent": present } })).into_response()
}

async fn not_found(State(state): State<Shared>, method: Method, uri: Uri) -> Response {
    record(&state, &method, &uri);
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
        .into_response()
}
