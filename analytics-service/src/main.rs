use anyhow::Result;
use analytics_service::{
    api::{self, AppState},
    config::AppConfig,
    metrics_server,
    narrative::{ChatCompletionsProvider, DisabledProvider, NarrativeSynthesizer, TextProvider},
    observability,
    pipeline::{AnomalyPipeline, ReportPipeline},
    store::{MetricStore, PgMetricStore},
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // /metrics is served on the API port; a separate listener is optional
    metrics_server::install()?;
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::spawn_listener(&metrics_cfg.bind_addr)?;
    }

    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.database.acquire_timeout_secs))
        .connect(&cfg.database.uri)
        .await?;
    let store: Arc<dyn MetricStore> = Arc::new(PgMetricStore::new(pool));

    let narrative_cfg = &cfg.narrative;
    let timeout = Duration::from_secs(narrative_cfg.timeout_seconds);
    let provider: Arc<dyn TextProvider> = match &narrative_cfg.api_key {
        Some(key) => Arc::new(ChatCompletionsProvider::new(
            &narrative_cfg.base_url,
            key.clone(),
            narrative_cfg.model.clone(),
            narrative_cfg.temperature,
            narrative_cfg.max_tokens,
            timeout,
        )?),
        None => {
            tracing::warn!("no narrative API key configured; reports will use the fallback template");
            Arc::new(DisabledProvider)
        }
    };

    let state = AppState {
        reports: ReportPipeline {
            store: store.clone(),
            synthesizer: NarrativeSynthesizer::new(provider, timeout),
            kpi: cfg.kpi.clone(),
        },
        anomalies: AnomalyPipeline {
            store,
            detector: cfg.anomaly.detector.clone(),
            window_days: cfg.anomaly.window_days,
        },
    };

    api::serve(&cfg.http.bind_addr, state).await
}
