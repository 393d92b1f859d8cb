//! In-process stand-in for the attendance backend.
//!
//! An axum router bound to `127.0.0.1:0` answers canned replies per
//! `(method, path)` and records every request it sees, so tests can assert
//! both what was sent and that nothing was sent at all.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use super::api::ApiClient;
use crate::capture::CapturedImage;
use crate::config::ClientConfig;

/// One request as the backend saw it.
#[derive(Clone, Debug)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Hit {
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }

    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A canned answer for one route.
#[derive(Clone, Debug)]
pub struct Reply {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

impl Reply {
    #[must_use]
    pub fn json(method: Method, path: &str, status: u16, body: Value) -> Self {
        Self::raw(method, path, status, &body.to_string())
    }

    #[must_use]
    pub fn raw(method: Method, path: &str, status: u16, body: &str) -> Self {
        Self {
            method,
            path: path.to_owned(),
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.to_owned(),
            delay: None,
        }
    }

    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct Shared {
    replies: Arc<HashMap<(Method, String), Reply>>,
    hits: Arc<Mutex<Vec<Hit>>>,
}

pub struct MockBackend {
    pub base_url: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl MockBackend {
    pub async fn start(replies: Vec<Reply>) -> Self {
        let replies = replies
            .into_iter()
            .map(|reply| ((reply.method.clone(), reply.path.clone()), reply))
            .collect();
        let shared = Shared { replies: Arc::new(replies), hits: Arc::default() };
        let hits = shared.hits.clone();
        let router = Router::new().fallback(answer).with_state(shared);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve mock backend");
        });

        Self { base_url: format!("http://{addr}"), hits }
    }

    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(&self.base_url)
            .expect("mock base url")
    }

    /// Client without a token.
    #[must_use]
    pub fn anonymous(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("build client")
    }

    /// Client holding a bearer token.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        self.anonymous().with_token("test-token")
    }

    #[must_use]
    pub fn client_with_timeout(&self, timeout: Duration) -> ApiClient {
        let config = ClientConfig { request_timeout: timeout, ..self.config() };
        ApiClient::new(&config).expect("build client").with_token("test-token")
    }

    #[must_use]
    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().expect("hits lock").clone()
    }

    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.hits.lock().expect("hits lock").len()
    }
}

async fn answer(State(shared): State<Shared>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header_text = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned)
    };
    let hit = Hit {
        method: parts.method.clone(),
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().map(ToOwned::to_owned),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: bytes.to_vec(),
    };
    let key = (hit.method.clone(), hit.path.clone());
    shared.hits.lock().expect("hits lock").push(hit);

    let Some(reply) = shared.replies.get(&key).cloned() else {
        return (StatusCode::NOT_FOUND, r#"{"error":"route not mocked"}"#).into_response();
    };
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    Response::builder()
        .status(reply.status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(reply.body))
        .expect("mock response")
}

/// A tiny JPEG-looking payload.
#[must_use]
pub fn jpeg(name: &str) -> CapturedImage {
    CapturedImage::new(vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3], name).expect("non-empty image")
}

/// Address nothing listens on.
#[must_use]
pub fn dead_client() -> ApiClient {
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .expect("dead base url");
    ApiClient::new(&config).expect("build client").with_token("test-token")
}
