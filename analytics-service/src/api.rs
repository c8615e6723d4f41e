//! HTTP surface over the report and anomaly pipelines.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    metrics_server,
    pipeline::{
        AnomalyPipeline, AnomalyReport, AnomalyRequest, PipelineError, ReportOutcome,
        ReportPipeline, ReportRequest,
    },
};

const SERVICE_NAME: &str = "ESG Analytics Service";

#[derive(Clone)]
pub struct AppState {
    pub reports: ReportPipeline,
    pub anomalies: AnomalyPipeline,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match &self {
            PipelineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PipelineError::DataAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ai/generate-report", post(generate_report))
        .route("/ai/detect-anomalies", post(detect_anomalies))
        .merge(metrics_server::routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(Arc::new(state))
}

/// Serve the API until ctrl-c.
pub async fn serve(bind_addr: &str, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "ESG analytics API listening");

    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;

    Ok(())
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// Unreadable or incomplete bodies are validation failures like any other.
fn body_rejected(rejection: JsonRejection) -> PipelineError {
    PipelineError::Validation(rejection.body_text())
}

async fn generate_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<ReportOutcome>, PipelineError> {
    metrics::counter!("http_report_requests_total").increment(1);
    let Json(request) = payload.map_err(body_rejected)?;
    state.reports.run(&request).await.map(Json)
}

async fn detect_anomalies(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnomalyRequest>, JsonRejection>,
) -> Result<Json<AnomalyReport>, PipelineError> {
    metrics::counter!("http_anomaly_requests_total").increment(1);
    let Json(request) = payload.map_err(body_rejected)?;
    state.anomalies.run(&request).await.map(Json)
}
