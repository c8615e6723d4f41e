use serde::Deserialize;
use std::fs;

use crate::{anomaly::DetectorSettings, kpi::KpiSettings, validation::MAX_TRAILING_DAYS};

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub base_url: String,
    /// Falls back to `OPENAI_API_KEY`; without a key every report uses the
    /// fallback template.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Length of the trailing analysis window.
    pub window_days: i64,
    #[serde(flatten)]
    pub detector: DetectorSettings,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            detector: DetectorSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
    #[serde(default)]
    pub anomaly: AnomalyConfig,
    #[serde(default)]
    pub kpi: KpiSettings,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("ESG_ANALYTICS_CONFIG").unwrap_or_else(|_| "analytics-config.toml".to_string());
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config {path}: {e}"))?;
        let mut cfg = Self::from_toml_str(&contents)?;

        if cfg.narrative.api_key.is_none() {
            cfg.narrative.api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        }
        Ok(cfg)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;

        let days = cfg.anomaly.window_days;
        if !(1..=MAX_TRAILING_DAYS).contains(&days) {
            anyhow::bail!("anomaly.window_days must be between 1 and {MAX_TRAILING_DAYS}, got {days}");
        }
        Ok(cfg)
    }
}
