use anyhow::{bail, Result};
use analytics_service::{
    anomaly::{self, DetectorSettings},
    config::AppConfig,
    observability, series_csv,
};
use std::{env, fs::File};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: score_series <csv_file_path>");
    }
    let file_path = &args[1];

    // Detector settings come from the service config when one is present.
    let settings = match AppConfig::load() {
        Ok(cfg) => cfg.anomaly.detector,
        Err(e) => {
            tracing::info!(error = %e, "no usable service config, using default detector settings");
            DetectorSettings::default()
        }
    };

    let file = File::open(file_path).map_err(|e| anyhow::anyhow!("failed to open {file_path}: {e}"))?;
    let series = series_csv::read_series(file)?;

    let anomalies = anomaly::detect(&series, &settings);
    tracing::info!(
        samples = series.len(),
        anomalies = anomalies.len(),
        "series scored"
    );

    println!("{}", serde_json::to_string_pretty(&anomalies)?);

    Ok(())
}
