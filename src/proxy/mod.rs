//! Local `GET /api/route?step=&workflow=` endpoint.
//!
//! Fetches the workflow document from the admin API and answers with the
//! raw JSON of a single step.

mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;

pub use error::ProxyError;

#[derive(Debug)]
struct ProxyState {
    client: reqwest::Client,
    upstream: String,
}

#[derive(Debug, Deserialize)]
pub struct StepQuery {
    pub step: Option<String>,
    pub workflow: Option<String>,
}

pub fn router(upstream: &str) -> Result<Router> {
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to create HTTP client")?;
    let state = Arc::new(ProxyState {
        client,
        upstream: upstream.trim_end_matches('/').to_string(),
    });

    Ok(Router::new()
        .route("/api/route", get(handle_route))
        .with_state(state))
}

pub async fn serve(bind: SocketAddr, upstream: &str) -> Result<()> {
    let app = router(upstream)?;
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, upstream = %upstream, "Starting step proxy");
    axum::serve(listener, app).await.context("Proxy server failed")
}

/// Handle GET /api/route
async fn handle_route(
    State(state): State<Arc<ProxyState>>,
    Query(query): Query<StepQuery>,
) -> Result<Json<Value>, ProxyError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(step), Some(workflow)) = (non_empty(query.step), non_empty(query.workflow)) else {
        return Err(ProxyError::MissingParameter);
    };

    tracing::debug!(step = %step, workflow = %workflow, "Proxy step request");

    let url = format!(
        "{}/Workflows/{}",
        state.upstream,
        urlencoding::encode(&workflow)
    );
    let response = state
        .client
        .get(&url)
        .send()
        .await
        .map_err(|e| ProxyError::Internal(e.to_string()))?;

    let status = response.status();
    tracing::debug!(status = %status, "Upstream fetch status");
    if !status.is_success() {
        let status = StatusCode::from_u16(status.as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Err(ProxyError::Upstream(status));
    }

    let data: Value = response
        .json()
        .await
        .map_err(|e| ProxyError::Internal(e.to_string()))?;

    match data.pointer("/data").and_then(|d| d.get(&step)) {
        Some(step_data) if !step_data.is_null() => Ok(Json(step_data.clone())),
        _ => Err(ProxyError::StepNotFound { step, workflow }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn upstream_with_workflow() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/Workflows/wf-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": { "step1": { "name": "MEQ Checklist", "stepOrder": 1 } }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/Workflows/gone"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_returns_step_json() {
        let server = upstream_with_workflow().await;
        let app = router(&server.uri()).unwrap();
        let (status, body) = call(app, "/api/route?step=step1&workflow=wf-1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "name": "MEQ Checklist", "stepOrder": 1 }));
    }

    #[tokio::test]
    async fn test_missing_parameter() {
        let server = upstream_with_workflow().await;
        for uri in ["/api/route?step=step1", "/api/route?workflow=wf-1&step="] {
            let app = router(&server.uri()).unwrap();
            let (status, body) = call(app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Missing step or workflow parameter");
        }
    }

    #[tokio::test]
    async fn test_unknown_step() {
        let server = upstream_with_workflow().await;
        let app = router(&server.uri()).unwrap();
        let (status, body) = call(app, "/api/route?step=step3&workflow=wf-1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"],
            "Step \"step3\" not found in workflow \"wf-1\""
        );
    }

    #[tokio::test]
    async fn test_upstream_status_is_passed_through() {
        let server = upstream_with_workflow().await;
        let app = router(&server.uri()).unwrap();
        let (status, body) = call(app, "/api/route?step=step1&workflow=gone").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Failed to fetch workflow data");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_internal_error() {
        // Nothing listens on port 9 of the loopback.
        let app = router("http://127.0.0.1:9").unwrap();
        let (status, body) = call(app, "/api/route?step=step1&workflow=wf-1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
    }
}
