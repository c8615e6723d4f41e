use esg_client::{
    db::esg_queries,
    domain::{CategoryAggregate, MetricCategory, MetricReading, ProductionAggregate},
};
use sqlx::postgres::PgPool;

use crate::validation::TimeWindow;

/// Read-only access to the metric store.
#[async_trait::async_trait]
pub trait MetricStore: Send + Sync {
    async fn category_aggregate(
        &self,
        category: MetricCategory,
        company_id: &str,
        window: TimeWindow,
    ) -> anyhow::Result<CategoryAggregate>;

    async fn production_aggregate(
        &self,
        company_id: &str,
        window: TimeWindow,
    ) -> anyhow::Result<ProductionAggregate>;

    async fn factory_series(
        &self,
        category: MetricCategory,
        factory_id: &str,
        window: TimeWindow,
    ) -> anyhow::Result<Vec<MetricReading>>;
}

/// Postgres/TimescaleDB-backed store.
pub struct PgMetricStore {
    pool: PgPool,
}

impl PgMetricStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MetricStore for PgMetricStore {
    async fn category_aggregate(
        &self,
        category: MetricCategory,
        company_id: &str,
        window: TimeWindow,
    ) -> anyhow::Result<CategoryAggregate> {
        esg_queries::category_aggregate(&self.pool, category, company_id, window.start, window.end).await
    }

    async fn production_aggregate(
        &self,
        company_id: &str,
        window: TimeWindow,
    ) -> anyhow::Result<ProductionAggregate> {
        esg_queries::production_aggregate(&self.pool, company_id, window.start, window.end).await
    }

    async fn factory_series(
        &self,
        category: MetricCategory,
        factory_id: &str,
        window: TimeWindow,
    ) -> anyhow::Result<Vec<MetricReading>> {
        esg_queries::factory_series(&self.pool, category, factory_id, window.start, window.end).await
    }
}
