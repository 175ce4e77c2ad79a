//! Shared helpers for route tests.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::util::ServiceExt;

use crate::api::state::AppState;
use crate::config::GeofenceConfig;
use crate::resolve::{RedirectResolver, Resolved, ResolveError};
use crate::storage::StorageConfig;

/// Resolver double that never touches the network. Expands every short
/// link to the configured URL, or fails when `fail` is set.
pub struct StubResolver {
    pub final_url: String,
    pub fail: bool,
}

impl StubResolver {
    pub fn returning(final_url: &str) -> Self {
        Self {
            final_url: final_url.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            final_url: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl RedirectResolver for StubResolver {
    async fn resolve(&self, _url: &str) -> Result<Resolved, ResolveError> {
        if self.fail {
            return Err(ResolveError::InvalidUrl("stub failure".to_string()));
        }
        Ok(Resolved {
            final_url: self.final_url.clone(),
            body: None,
        })
    }
}

/// App state over a temp directory with a canned resolver.
pub fn setup_test_state(dir: &Path) -> AppState {
    setup_test_state_with_resolver(
        dir,
        Arc::new(StubResolver::returning(
            "https://www.google.com/maps?q=30.5,31.25",
        )),
    )
}

pub fn setup_test_state_with_resolver(
    dir: &Path,
    resolver: Arc<dyn RedirectResolver>,
) -> AppState {
    let storage = StorageConfig::new(dir.to_path_buf());
    AppState::new(storage, resolver, GeofenceConfig::default())
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PATCH", uri, Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, None).await
}

/// GET returning the raw body, for non-JSON responses like the CSV export.
pub async fn get_raw(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}
