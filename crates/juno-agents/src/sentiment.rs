use async_trait::async_trait;
use juno_models::{AgentKind, Opinion, OpinionDetail};
use rand::Rng;
use tracing::warn;

use crate::agent::{calculate_confidence, normalize_score, AnalysisRequest, ScoringAgent};
use crate::error::AgentError;
use crate::llm::{model_opinion, LlmClient};

/// Scores crowd psychology: fear/greed, social volume, influencer tone,
/// and funding rates.
pub struct SentimentAgent {
    llm: Option<LlmClient>,
}

impl SentimentAgent {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    /// Placeholder for a social/news feed pipeline. Draws the sub-factors
    /// at random; the clamp invariants hold for every draw.
    fn analyze_synthetic(&self) -> Opinion {
        let mut rng = rand::thread_rng();

        let fear_greed_index = rng.gen::<f64>() * 100.0;
        let social_volume = rng.gen::<f64>() * 100.0;
        let influencer_sentiment = (rng.gen::<f64>() - 0.5) * 4.0;
        let funding_rate = (rng.gen::<f64>() - 0.5) * 0.02;

        let fear_greed_score = (fear_greed_index - 50.0) / 25.0;
        // High positive funding reads as crowded longs, so invert it.
        let funding_score = -funding_rate * 100.0;

        let raw_score =
            fear_greed_score * 0.4 + influencer_sentiment * 0.4 + funding_score * 0.2;
        let factors = [fear_greed_score, influencer_sentiment, funding_score];

        let mut highlights = Vec::new();
        if fear_greed_index < 25.0 {
            highlights.push("Extreme fear in market sentiment".to_string());
        }
        if fear_greed_index > 75.0 {
            highlights.push("Extreme greed detected".to_string());
        }
        if funding_rate.abs() > 0.01 {
            let direction = if funding_rate > 0.0 {
                "High positive"
            } else {
                "Negative"
            };
            highlights.push(format!("{direction} funding rates"));
        }
        if social_volume > 70.0 {
            highlights.push("High social media volume".to_string());
        }

        Opinion {
            score: normalize_score(raw_score),
            confidence: calculate_confidence(&factors),
            highlights,
            sources: vec![
                "@trader123".to_string(),
                "reddit.com/r/bitcoin".to_string(),
                "cryptofear.com".to_string(),
                "coinglass.com".to_string(),
            ],
            detail: OpinionDetail::Base,
        }
    }
}

#[async_trait]
impl ScoringAgent for SentimentAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Sentiment
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
