//! In process stand-in for an ArangoDB server
#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn statistics(counts: &[u32]) -> serde_json::Value {
    serde_json::json!({
        "time": 1_700_000_000.0,
        "enabled": true,
        "system": {
            "majorPageFaults": 5,
            "minorPageFaults": 12,
            "numberOfThreads": 3,
            "residentSize": 2048,
            "systemTime": 0.25,
            "userTime": 1.5,
            "virtualSize": 4096
        },
        "server": { "physicalMemory": 1024, "uptime": 3.5 },
        "client": { "requestTime": { "requestTime": 10, "counts": counts, "sum": 7.2 } }
    })
}

#[derive(Debug, Clone)]
pub enum StatsBody {
    Json(serde_json::Value),
    Raw(&'static str),
}

#[derive(Debug)]
pub struct Mock {
    pub username: String,
    pub password: String,
    pub token: String,
    pub stats: StatsBody,
    pub delay: Duration,
    pub logins: AtomicUsize,
    pub authorization: Mutex<Vec<String>>,
}

impl Mock {
    pub fn new() -> Self {
        Self {
            username: "root".to_string(),
            password: "secret".to_string(),
            token: "header.payload.signature".to_string(),
            stats: StatsBody::Json(statistics(&[1, 2, 3, 4, 5, 6, 0])),
            delay: Duration::ZERO,
            logins: AtomicUsize::new(0),
            authorization: Mutex::new(Vec::new()),
        }
    }

    pub fn token(self, token: &str) -> Self {
        Self {
            token: token.to_string(),
            ..self
        }
    }

    pub fn password(self, password: &str) -> Self {
        Self {
            password: password.to_string(),
            ..self
        }
    }

    pub fn stats(self, stats: StatsBody) -> Self {
        Self { stats, ..self }
    }

    pub fn delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn authorization_headers(&self) -> Vec<String> {
        self.authorization.lock().unwrap().clone()
    }
}

async fn login(State(mock): State<Arc<Mock>>, Json(body): Json<serde_json::Value>) -> Response {
    mock.logins.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(mock.delay).await;

    if body["username"] == mock.username.as_str() && body["password"] == mock.password.as_str() {
        Json(serde_json::json!({ "jwt": mock.token })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": true, "code": 401, "errorMessage": "Wrong credentials" })),
        )
            .into_response()
    }
}

async fn statistics_handler(State(mock): State<Arc<Mock>>, headers: HeaderMap) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    mock.authorization.lock().unwrap().push(auth.clone());

    if auth != format!("Bearer {}", mock.token) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match &mock.stats {
        StatsBody::Json(v) => Json(v.clone()).into_response(),
        StatsBody::Raw(s) => (*s).into_response(),
    }
}

/// Serve `mock` on an ephemeral port, returns the base URL
pub async fn serve(mock: Arc<Mock>) -> String {
    let app = Router::new()
        .route("/_open/auth", post(login))
        .route("/_admin/statistics", get(statistics_handler))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing listens on
pub async fn unreachable() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
