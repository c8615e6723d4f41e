pub mod aggregate;
pub mod category;
pub mod metric_reading;

pub use aggregate::{AggregateRow, CategoryAggregate, ProductionAggregate, ProductionRow};
pub use category::{MetricCategory, UnknownCategory};
pub use metric_reading::MetricReading;
