//! Report narratives.
//!
//! A [`TextProvider`] writes the report from a fixed prompt. Any provider
//! failure, including a timeout, yields the fixed fallback template instead,
//! so a report is always produced once metrics exist.

pub mod chat_completions;
pub mod template;

use std::{sync::Arc, time::Duration};

use crate::kpi::EsgMetrics;

pub use chat_completions::ChatCompletionsProvider;

/// What the report is about, beyond the numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// Reporting standard, e.g. `GRI`.
    pub standard: String,
    pub period_start: String,
    pub period_end: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("provider is not configured")]
    Disabled,
    #[error("provider timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider transport error: {0}")]
    Transport(String),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

#[async_trait::async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}

/// Provider used when no credentials are configured; every call declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProvider;

#[async_trait::async_trait]
impl TextProvider for DisabledProvider {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
        Err(ProviderError::Disabled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narrative {
    Generated(String),
    Fallback(String),
}

impl Narrative {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Narrative::Fallback(_))
    }

    pub fn into_text(self) -> String {
        match self {
            Narrative::Generated(text) | Narrative::Fallback(text) => text,
        }
    }
}

#[derive(Clone)]
pub struct NarrativeSynthesizer {
    provider: Arc<dyn TextProvider>,
    timeout: Duration,
}

impl NarrativeSynthesizer {
    pub fn new(provider: Arc<dyn TextProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn synthesize(&self, esg: &EsgMetrics, ctx: &ReportContext) -> Narrative {
        let request = GenerationRequest {
            system: template::SYSTEM_PROMPT.to_string(),
            prompt: template::render_prompt(esg, ctx),
        };

        let outcome = match tokio::time::timeout(self.timeout, self.provider.generate(&request)).await {
            Ok(res) => res,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(text) if !text.trim().is_empty() => Narrative::Generated(text),
            Ok(_) => {
                tracing::warn!("provider returned empty narrative, using fallback template");
                metrics::counter!("esg_report_fallback_total").increment(1);
                Narrative::Fallback(template::render_fallback(esg, ctx))
            }
            Err(e) => {
                tracing::warn!(error = %e, standard = %ctx.standard, "narrative generation failed, using fallback template");
                metrics::counter!("esg_report_fallback_total").increment(1);
                Narrative::Fallback(template::render_fallback(esg, ctx))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: Result<String, String>,
        delay: Option<Duration>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(msg: &str) -> Self {
            Self {
                reply: Err(msg.to_string()),
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl TextProvider for ScriptedProvider {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone().map_err(ProviderError::Transport)
        }
    }

    fn metrics() -> EsgMetrics {
        EsgMetrics {
            total_energy_kwh: 15234.567,
            total_water_liters: 80200.0,
            total_waste_kg: 412.25,
            avg_energy_per_unit: 3.046,
            carbon_footprint_estimate: 6398.518,
            water_efficiency: 16.04,
            waste_recycled_percentage: 75.0,
        }
    }

    fn ctx() -> ReportContext {
        ReportContext {
            standard: "GRI".to_string(),
            period_start: "2024-01-01".to_string(),
            period_end: "2024-03-31".to_string(),
        }
    }

    #[tokio::test]
    async fn provider_text_is_returned_as_generated() {
        let provider = Arc::new(ScriptedProvider::replying("# Annual ESG report"));
        let synth = NarrativeSynthesizer::new(provider.clone(), Duration::from_secs(5));

        let narrative = synth.synthesize(&metrics(), &ctx()).await;
        assert_eq!(narrative, Narrative::Generated("# Annual ESG report".to_string()));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system, template::SYSTEM_PROMPT);
        assert!(seen[0].prompt.contains("Total Energy Consumption: 15234.57 kWh"));
        assert!(seen[0].prompt.contains("**Reporting Period:** 2024-01-01 to 2024-03-31"));
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_template() {
        let synth = NarrativeSynthesizer::new(
            Arc::new(ScriptedProvider::failing("quota exceeded")),
            Duration::from_secs(5),
        );

        let narrative = synth.synthesize(&metrics(), &ctx()).await;
        assert!(narrative.is_fallback());

        let text = narrative.into_text();
        assert_eq!(text, template::render_fallback(&metrics(), &ctx()));
        assert!(text.starts_with("# GRI ESG Compliance Report"));
        assert!(text.contains("**Reporting Period:** 2024-01-01 to 2024-03-31"));
        assert!(text.contains("- Total Energy: 15234.57 kWh"));
        assert!(text.contains("- Estimated Carbon Footprint: 6398.52 kg CO2"));
        assert!(text.contains("- Water Efficiency: 16.04 liters/unit"));
        assert!(text.contains("- Total Waste Generated: 412.25 kg"));
        assert!(text.contains("- Waste Recycled: 75.0%"));
    }

    #[tokio::test]
    async fn slow_provider_falls_back() {
        let provider = ScriptedProvider {
            delay: Some(Duration::from_secs(30)),
            ..ScriptedProvider::replying("too late")
        };
        let synth = NarrativeSynthesizer::new(Arc::new(provider), Duration::from_millis(20));

        let narrative = synth.synthesize(&metrics(), &ctx()).await;
        assert_eq!(narrative, Narrative::Fallback(template::render_fallback(&metrics(), &ctx())));
    }

    #[tokio::test]
    async fn blank_reply_falls_back() {
        let synth = NarrativeSynthesizer::new(
            Arc::new(ScriptedProvider::replying("   \n")),
            Duration::from_secs(5),
        );
        assert!(synth.synthesize(&metrics(), &ctx()).await.is_fallback());
    }

    #[tokio::test]
    async fn disabled_provider_always_falls_back() {
        let synth = NarrativeSynthesizer::new(Arc::new(DisabledProvider), Duration::from_secs(5));
        assert!(synth.synthesize(&metrics(), &ctx()).await.is_fallback());
    }
}
