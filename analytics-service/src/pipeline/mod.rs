use std::sync::Arc;

use esg_client::domain::MetricCategory;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    anomaly::{self, Anomaly, DetectorSettings},
    kpi::{self, EsgMetrics, KpiSettings, ReportAggregates},
    narrative::{NarrativeSynthesizer, ReportContext},
    store::MetricStore,
    validation::{self, TimeWindow},
};

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("data access error: {0}")]
    DataAccess(String),
}

impl PipelineError {
    fn data_access(e: anyhow::Error) -> Self {
        PipelineError::DataAccess(format!("{e:#}"))
    }
}

fn default_report_type() -> String {
    "GRI".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub company_id: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_report_type")]
    pub report_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report_content: String,
    pub metrics: EsgMetrics,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnomalyRequest {
    pub factory_id: String,
    pub metric_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
    pub total_anomalies: usize,
    pub analysis_period: String,
}

/// Aggregates → KPIs → narrative.
#[derive(Clone)]
pub struct ReportPipeline {
    pub store: Arc<dyn MetricStore>,
    pub synthesizer: NarrativeSynthesizer,
    pub kpi: KpiSettings,
}

impl ReportPipeline {
    /// Reduce every category of a company over the window. The four queries
    /// run concurrently; the first failure fails the whole reduction.
    pub async fn aggregate(
        &self,
        company_id: &str,
        window: TimeWindow,
    ) -> Result<ReportAggregates, PipelineError> {
        let store = self.store.as_ref();
        let (energy, water, waste, production) = tokio::try_join!(
            store.category_aggregate(MetricCategory::Energy, company_id, window),
            store.category_aggregate(MetricCategory::Water, company_id, window),
            store.category_aggregate(MetricCategory::Waste, company_id, window),
            store.production_aggregate(company_id, window),
        )
        .map_err(PipelineError::data_access)?;

        Ok(ReportAggregates {
            energy,
            water,
            waste,
            production,
        })
    }

    pub async fn run(&self, request: &ReportRequest) -> Result<ReportOutcome, PipelineError> {
        let window = validation::parse_window(&request.start_date, &request.end_date)?;

        let aggregates = self.aggregate(&request.company_id, window).await.map_err(|e| {
            tracing::error!(error = %e, company_id = %request.company_id, "report aggregation failed");
            e
        })?;
        let esg = kpi::calculate(&aggregates, &self.kpi);

        let ctx = ReportContext {
            standard: request.report_type.clone(),
            period_start: request.start_date.clone(),
            period_end: request.end_date.clone(),
        };
        let narrative = self.synthesizer.synthesize(&esg, &ctx).await;

        metrics::counter!("esg_reports_generated_total").increment(1);
        tracing::info!(
            company_id = %request.company_id,
            standard = %request.report_type,
            energy_readings = aggregates.energy.count,
            water_readings = aggregates.water.count,
            waste_readings = aggregates.waste.count,
            production_runs = aggregates.production.run_count,
            fallback = narrative.is_fallback(),
            "ESG report generated"
        );

        Ok(ReportOutcome {
            report_content: narrative.into_text(),
            metrics: esg,
            generated_at: OffsetDateTime::now_utc(),
        })
    }
}

/// Trailing-window series fetch → anomaly scoring.
#[derive(Clone)]
pub struct AnomalyPipeline {
    pub store: Arc<dyn MetricStore>,
    pub detector: DetectorSettings,
    pub window_days: i64,
}

impl AnomalyPipeline {
    pub async fn run(&self, request: &AnomalyRequest) -> Result<AnomalyReport, PipelineError> {
        self.run_at(request, OffsetDateTime::now_utc()).await
    }

    /// Same as [`run`](Self::run) with the window ending at `now`.
    pub async fn run_at(
        &self,
        request: &AnomalyRequest,
        now: OffsetDateTime,
    ) -> Result<AnomalyReport, PipelineError> {
        let category = validation::parse_category(&request.metric_type)?;
        let window = TimeWindow::trailing(now, self.window_days)?;

        let series = self
            .store
            .factory_series(category, &request.factory_id, window)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, factory_id = %request.factory_id, %category, "series fetch failed");
                PipelineError::data_access(e)
            })?;

        let anomalies = anomaly::detect(&series, &self.detector);

        metrics::counter!("anomaly_detections_total", "category" => category.as_str()).increment(1);
        metrics::counter!("anomalies_flagged_total", "category" => category.as_str())
            .increment(anomalies.len() as u64);
        tracing::info!(
            factory_id = %request.factory_id,
            %category,
            samples = series.len(),
            anomalies = anomalies.len(),
            "anomaly detection finished"
        );

        Ok(AnomalyReport {
            total_anomalies: anomalies.len(),
            anomalies,
            analysis_period: window.describe(),
        })
    }
}
