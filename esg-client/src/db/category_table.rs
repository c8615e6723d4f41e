use crate::domain::MetricCategory;

/// How rows of a metric table are tied back to their factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// `device_id` references `iot_devices`, which carries the factory.
    ViaDevice,
    /// The table carries a `factory_id` column of its own.
    FactoryColumn,
}

/// Table and columns backing one metric category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTable {
    pub table: &'static str,
    pub ownership: Ownership,
    pub total_column: &'static str,
    pub average_column: &'static str,
    pub series_column: &'static str,
}

const ENERGY: CategoryTable = CategoryTable {
    table: "energy_metrics",
    ownership: Ownership::ViaDevice,
    total_column: "kwh",
    average_column: "kwh",
    series_column: "kwh",
};

const WATER: CategoryTable = CategoryTable {
    table: "water_metrics",
    ownership: Ownership::ViaDevice,
    total_column: "volume_liters",
    average_column: "flow_rate",
    series_column: "flow_rate",
};

const WASTE: CategoryTable = CategoryTable {
    table: "waste_metrics",
    ownership: Ownership::FactoryColumn,
    total_column: "weight_kg",
    average_column: "weight_kg",
    series_column: "weight_kg",
};

impl CategoryTable {
    pub fn for_category(category: MetricCategory) -> &'static CategoryTable {
        match category {
            MetricCategory::Energy => &ENERGY,
            MetricCategory::Water => &WATER,
            MetricCategory::Waste => &WASTE,
        }
    }

    /// `FROM ... JOIN ...` clause exposing the metric rows as `m` and the
    /// owning factory as `f`.
    fn from_clause(&self) -> String {
        match self.ownership {
            Ownership::ViaDevice => format!(
                "FROM {table} m \
                 JOIN iot_devices d ON m.device_id = d.device_id \
                 JOIN factories f ON d.factory_id = f.id",
                table = self.table
            ),
            Ownership::FactoryColumn => format!(
                "FROM {table} m \
                 JOIN factories f ON m.factory_id = f.id::text",
                table = self.table
            ),
        }
    }

    /// Company-wide SUM/AVG/COUNT over a closed window.
    ///
    /// Binds: `$1` company id, `$2` window start, `$3` window end.
    pub fn company_aggregate_sql(&self) -> String {
        format!(
            r#"
        SELECT
            SUM(m.{total})::float8   AS total,
            AVG(m.{average})::float8 AS average,
            COUNT(*)                 AS count
        {from}
        WHERE f.company_id::text = $1
          AND m."timestamp" BETWEEN $2 AND $3
        "#,
            total = self.total_column,
            average = self.average_column,
            from = self.from_clause(),
        )
    }

    /// Time-ordered series of one factory over a closed window.
    ///
    /// Binds: `$1` factory id, `$2` window start, `$3` window end.
    pub fn factory_series_sql(&self) -> String {
        format!(
            r#"
        SELECT
            m."timestamp"        AS ts,
            m.{series}::float8   AS value
        {from}
        WHERE f.id::text = $1
          AND m."timestamp" BETWEEN $2 AND $3
          AND m.{series} IS NOT NULL
        ORDER BY m."timestamp"
        "#,
            series = self.series_column,
            from = self.from_clause(),
        )
    }
}
