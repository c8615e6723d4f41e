use std::io::Read;

use csv::StringRecord;
use esg_client::domain::MetricReading;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Read a metric series from CSV.
///
/// Expected header columns (by name):
/// - ts (RFC3339 timestamp)
/// - value
///
/// Rows with an empty value are skipped.
pub fn read_series<R: Read>(reader: R) -> anyhow::Result<Vec<MetricReading>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| anyhow::anyhow!("failed to read CSV headers: {e}"))?
        .clone();

    let ts_idx = column(&headers, "ts")?;
    let value_idx = column(&headers, "value")?;

    let mut series = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| anyhow::anyhow!("failed to read CSV record: {e}"))?;
        if let Some(reading) = record_to_reading(&record, ts_idx, value_idx)
            .map_err(|e| anyhow::anyhow!("record {}: {e}", line + 1))?
        {
            series.push(reading);
        }
    }

    Ok(series)
}

fn column(headers: &StringRecord, name: &str) -> anyhow::Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| anyhow::anyhow!("missing column '{name}' in CSV header"))
}

fn record_to_reading(
    record: &StringRecord,
    ts_idx: usize,
    value_idx: usize,
) -> anyhow::Result<Option<MetricReading>> {
    let value_str = record.get(value_idx).unwrap_or("").trim();
    if value_str.is_empty() {
        return Ok(None);
    }

    let ts_str = record.get(ts_idx).unwrap_or("").trim();
    let ts = OffsetDateTime::parse(ts_str, &Rfc3339)
        .map_err(|e| anyhow::anyhow!("invalid ts '{ts_str}': {e}"))?;
    let value: f64 = value_str
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid value '{value_str}': {e}"))?;

    Ok(Some(MetricReading::new(ts, value)))
}
