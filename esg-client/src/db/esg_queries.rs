use anyhow::Result;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::CategoryTable;
use crate::domain::{
    AggregateRow, CategoryAggregate, MetricCategory, MetricReading, ProductionAggregate,
    ProductionRow,
};

/// Runs count toward a window by the calendar date they started on.
const PRODUCTION_AGGREGATE_SQL: &str = r#"
    SELECT
        SUM(pr.units_produced)::int8 AS total_units,
        COUNT(*)                     AS run_count
    FROM production_runs pr
    JOIN factories f ON pr.factory_id = f.id
    WHERE f.company_id::text = $1
      AND pr.start_date BETWEEN ($2)::date AND ($3)::date
"#;

/// SUM/AVG/COUNT of one category across every factory of a company.
pub async fn category_aggregate(
    pool: &PgPool,
    category: MetricCategory,
    company_id: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<CategoryAggregate> {
    let sql = CategoryTable::for_category(category).company_aggregate_sql();

    let row = sqlx::query_as::<_, AggregateRow>(&sql)
        .bind(company_id)
        .bind(start)
        .bind(end)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(CategoryAggregate::from).unwrap_or_default())
}

/// Units produced by runs of a company that started within the window.
pub async fn production_aggregate(
    pool: &PgPool,
    company_id: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<ProductionAggregate> {
    let row = sqlx::query_as::<_, ProductionRow>(PRODUCTION_AGGREGATE_SQL)
        .bind(company_id)
        .bind(start)
        .bind(end)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(ProductionAggregate::from).unwrap_or_default())
}

/// Fetch the time-ordered readings of one category for a single factory.
pub async fn factory_series(
    pool: &PgPool,
    category: MetricCategory,
    factory_id: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<MetricReading>> {
    let sql = CategoryTable::for_category(category).factory_series_sql();

    let rows = sqlx::query_as::<_, MetricReading>(&sql)
        .bind(factory_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
