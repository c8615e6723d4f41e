use time::OffsetDateTime;

/// One reading of a metric stream. The category is implied by the query that
/// produced it.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricReading {
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub ts: OffsetDateTime,
    pub value: f64,
}

impl MetricReading {
    pub fn new(ts: OffsetDateTime, value: f64) -> Self {
        Self { ts, value }
    }
}
