pub mod anomaly;
pub mod api;
pub mod config;
pub mod kpi;
pub mod metrics_server;
pub mod narrative;
pub mod observability;
pub mod pipeline;
pub mod series_csv;
pub mod store;
pub mod validation;

pub use pipeline::{AnomalyPipeline, PipelineError, ReportPipeline};
