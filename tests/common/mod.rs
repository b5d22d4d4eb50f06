#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

use show_catalog::api::{self, AppState};
use show_catalog::cli::fixtures::{self, Populated};
use show_catalog::config::AppConfig;
use show_catalog::database::MemoryStore;

/// Router over an in-memory store; each test builds its own
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Option<Value>,
}

impl TestResponse {
    pub fn json(&self) -> &Value {
        self.body.as_ref().unwrap_or(&Value::Null)
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let router = api::app(AppState::new(store.clone(), AppConfig::development()));
        Self { store, router }
    }

    /// A fresh app seeded with the sample catalog
    pub async fn populated() -> Result<(Self, Populated)> {
        let app = Self::new();
        let populated = fixtures::populate(app.store.as_ref()).await?;
        Ok((app, populated))
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        let request = Request::builder().method("GET").uri(uri).body(Body::empty())?;
        self.send(request).await
    }

    pub async fn post(&self, uri: &str) -> Result<TestResponse> {
        let request = Request::builder().method("POST").uri(uri).body(Body::empty())?;
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Result<TestResponse> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?;
        self.send(request).await
    }

    /// POST an arbitrary body labelled as JSON
    pub async fn post_raw_json(&self, uri: &str, body: &'static str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await.context("request failed")?;

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).context("response body is not JSON")?)
        };

        Ok(TestResponse { status, location, body })
    }
}
