//! Analysis endpoint router.
//!
//! Every route answers every method. `OPTIONS` is the CORS preflight and
//! gets a bare acknowledgement; anything else runs the detector and returns
//! `{"findings": [...]}`. The request body is never read.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use vetai_vision_core::Finding;

use crate::detector::{to_findings, Detector};
use crate::error::ApiError;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Body returned for a successful analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct FindingsResponse {
    pub findings: Vec<Finding>,
}

/// Shared handler state.
#[derive(Clone)]
pub struct ApiContext {
    pub detector: Arc<dyn Detector>,
}

impl ApiContext {
    pub fn new(detector: Arc<dyn Detector>) -> Self {
        Self { detector }
    }
}

/// Build the analysis router.
pub fn analysis_router(detector: Arc<dyn Detector>) -> Router {
    let ctx = ApiContext::new(detector);

    Router::new()
        .route("/", any(analyze))
        .route("/analyze-image", any(analyze))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
}

/// `ANY /analyze-image`
async fn analyze(method: Method, State(ctx): State<ApiContext>) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::OK, "ok").into_response();
    }

    match run_detection(&ctx) {
        Ok(body) => {
            tracing::debug!(%method, findings = body.findings.len(), "Analysis served");
            Json(body).into_response()
        }
        Err(err) => err.into_response(),
    }
}

fn run_detection(ctx: &ApiContext) -> Result<FindingsResponse, ApiError> {
    let objects = ctx.detector.detect()?;
    let findings = to_findings(&objects)?;
    Ok(FindingsResponse { findings })
}
