use async_trait::async_trait;
use juno_models::{AgentKind, Opinion, OpinionDetail};
use rand::Rng;
use tracing::warn;

use crate::agent::{calculate_confidence, normalize_score, AnalysisRequest, ScoringAgent};
use crate::error::AgentError;
use crate::llm::{model_opinion, LlmClient};

/// Scores the macro backdrop: USD strength, yields, equity correlation,
/// and volatility regime.
pub struct MacroAgent {
    llm: Option<LlmClient>,
}

impl MacroAgent {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    /// Placeholder for yield-curve/DXY/VIX feeds.
    fn analyze_synthetic(&self) -> Opinion {
        let mut rng = rand::thread_rng();

        let dxy_trend = (rng.gen::<f64>() - 0.5) * 2.0;
        let yield_curve = rng.gen::<f64>() * 0.02 - 0.01;
        let real_yields = rng.gen::<f64>() * 0.04 - 0.02;
        let spx_correlation = rng.gen::<f64>() * 2.0 - 1.0;
        let vix_level = rng.gen::<f64>() * 50.0 + 10.0;

        // Strong dollar and high real yields both pressure crypto.
        let dxy_score = -dxy_trend;
        let rate_score = -real_yields * 50.0;
        let risk_on_score = if spx_correlation > 0.5 { 1.0 } else { -1.0 };
        let volatility_score = if vix_level > 30.0 { -1.0 } else { 0.5 };

        let raw_score = dxy_score * 0.3
            + rate_score * 0.3
            + risk_on_score * 0.25
            + volatility_score * 0.15;
        let factors = [dxy_score, rate_score, risk_on_score, volatility_score];

        let mut highlights = Vec::new();
        if dxy_trend.abs() > 0.5 {
            let strength = if dxy_trend > 0.0 { "Strong" } else { "Weak" };
            highlights.push(format!("{strength} USD momentum"));
        }
        if yield_curve < 0.0 {
            highlights.push("Inverted yield curve signals recession risk".to_string());
        }
        if real_yields > 0.01 {
            highlights.push("High real yields pressuring risk assets".to_string());
        }
        if vix_level > 30.0 {
            highlights.push("Elevated volatility regime".to_string());
        }
        if spx_correlation > 0.7 {
            highlights.push("High crypto-equity correlation".to_string());
        }

        Opinion {
            score: normalize_score(raw_score),
            confidence: calculate_confidence(&factors),
            highlights,
            sources: vec![
                "fed.com".to_string(),
                "treasury.gov".to_string(),
                "bloomberg.com".to_string(),
                "tradingview.com".to_string(),
            ],
            detail: OpinionDetail::Base,
        }
    }
}

#[async_trait]
impl ScoringAgent for MacroAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Macro
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<Opinion, AgentError> {
        if let Some(client) = &self.llm {
            match model_opinion(client, self.kind(), request).await {
                Ok(opinion) => return Ok(opinion),
                Err(e) => warn!(agent = %self.kind(), error = %e, "AI path failed, using synthetic"),
            }
        }
        Ok(self.analyze_synthetic())
    }
}
