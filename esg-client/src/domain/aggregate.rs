/// SUM/AVG/COUNT reduction of one category over a window.
///
/// All fields are zero when the window holds no readings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryAggregate {
    pub total: f64,
    pub average: f64,
    pub count: i64,
}

/// Units produced and number of production runs over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductionAggregate {
    pub total_units: i64,
    pub run_count: i64,
}

/// Raw row of a category reduction. SQL `SUM`/`AVG` are NULL over an empty set.
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct AggregateRow {
    pub total: Option<f64>,
    pub average: Option<f64>,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct ProductionRow {
    pub total_units: Option<i64>,
    pub run_count: Option<i64>,
}

impl From<AggregateRow> for CategoryAggregate {
    fn from(row: AggregateRow) -> Self {
        CategoryAggregate {
            total: row.total.unwrap_or(0.0),
            average: row.average.unwrap_or(0.0),
            count: row.count.unwrap_or(0).max(0),
        }
    }
}

impl From<ProductionRow> for ProductionAggregate {
    fn from(row: ProductionRow) -> Self {
        ProductionAggregate {
            total_units: row.total_units.unwrap_or(0),
            run_count: row.run_count.unwrap_or(0).max(0),
        }
    }
}
