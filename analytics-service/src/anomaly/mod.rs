pub mod isolation_forest;

use std::time::Instant;

use esg_client::domain::MetricReading;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub use isolation_forest::{fit_and_score, FitError, ForestScores, ForestSettings};

/// Series shorter than this are not scored.
pub const MIN_SAMPLES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Bands: `(0.5, ∞)` high, `(0.3, 0.5]` medium, anything else low.
    pub fn from_score(score: f64) -> Self {
        if score > 0.5 {
            Severity::High
        } else if score > 0.3 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub value: f64,
    pub anomaly_score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub min_samples: usize,
    #[serde(flatten)]
    pub forest: ForestSettings,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            min_samples: MIN_SAMPLES,
            forest: ForestSettings::default(),
        }
    }
}

/// Score a single-category series and return the flagged points, oldest first.
///
/// Short series and series the forest cannot fit yield an empty list.
pub fn detect(series: &[MetricReading], settings: &DetectorSettings) -> Vec<Anomaly> {
    if series.len() < settings.min_samples.max(2) {
        tracing::debug!(
            samples = series.len(),
            min_samples = settings.min_samples,
            "not enough samples for anomaly detection"
        );
        return Vec::new();
    }

    let values: Vec<f64> = series.iter().map(|r| r.value).collect();

    let started = Instant::now();
    let fit = match fit_and_score(&values, &settings.forest) {
        Ok(fit) => fit,
        Err(e) => {
            tracing::warn!(error = %e, samples = series.len(), "isolation forest fit failed, reporting no anomalies");
            return Vec::new();
        }
    };
    metrics::histogram!("anomaly_fit_seconds").record(started.elapsed().as_secs_f64());

    let mut anomalies: Vec<Anomaly> = fit
        .outliers()
        .map(|(idx, score)| Anomaly {
            timestamp: series[idx].ts,
            value: series[idx].value,
            anomaly_score: score,
            severity: Severity::from_score(score),
        })
        .collect();

    anomalies.sort_by_key(|a| a.timestamp);
    anomalies
}
