use async_trait::async_trait;
use juno_models::{AgentKind, KeyLevels, Opinion, OpinionDetail};
use rand::Rng;
use tracing::warn;

use crate::agent::{calculate_confidence, normalize_score, AnalysisRequest, ScoringAgent};
use crate::error::AgentError;
use crate::llm::{model_opinion, LlmClient};
use crate::query::{extract_asset, reference_price};

/// Scores price structure: momentum, trend, volume, and chart patterns.
/// Also emits support/resistance levels for the fusion engine.
pub struct TechnicalAgent {
    llm: Option<LlmClient>,
}

impl TechnicalAgent {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    /// Contract-shaped response for an uploaded chart. Placeholder for a
    /// vision model; levels are anchored around a drawn price.
    fn analyze_chart(&self) -> Opinion {
        let mut rng = rand::thread_rng();
        let price = 45_000.0 + rng.gen::<f64>() * 10_000.0;

        Opinion {
            score: normalize_score((rng.gen::<f64>() - 0.5) * 4.0),
            confidence: (60.0 + rng.gen::<f64>() * 30.0).round() as u8,
            highlights: vec![
                "Chart shows ascending triangle pattern".to_string(),
                "Volume confirming breakout attempt".to_string(),
                "RSI showing bullish divergence".to_string(),
            ],
            sources: vec!["Chart Analysis".to_string(), "Pattern Recognition".to_string()],
            detail: OpinionDetail::Technical {
                levels: KeyLevels {
                    support: vec![price * 0.95, price * 0.92],
                    resistance: vec![price * 1.05, price * 1.08],
                },
                patterns: vec![
                    "Ascending Triangle".to_string(),
                    "Bullish Divergence".to_string(),
                ],
            },
        }
    }

    /// Placeholder for an indicator pipeline over live candles.
    fn analyze_synthetic(&self, query: &str) -> Opinion {
        let mut rng = rand::thread_rng();

        let asset = extract_asset(query);
        let price = reference_price(&asset);

        let support = vec![
            (price * 0.95).round(),
            (price * 0.92).round(),
            (price * 0.88).round(),
        ];
        let resistance = vec![
            (price * 1.05).round(),
            (price * 1.08).round(),
            (price * 1.12).round(),
        ];

        let rsi = rng.gen::<f64>() * 100.0;
        let macd_signal = (rng.gen::<f64>() - 0.5) * 2.0;
        let trend_strength = rng.gen::<f64>() * 2.0 - 1.0;
        let volume_profile = rng.gen::<f64>();

        let rsi_score = if rsi > 70.0 {
            -1.0
        } else if rsi < 30.0 {
            1.0
        } else {
            0.0
        };
        let volume_score = if volume_profile > 0.6 {
            0.5
        } else if volume_profile < 0.3 {
            -0.5
        } else {
            0.0
        };

        let raw_score = rsi_score * 0.25
            + macd_signal * 0.3
            + trend_strength * 0.35
            + volume_score * 0.1;
        let factors = [rsi_score, macd_signal, trend_strength, volume_score];

        let patterns = detect_patterns(rsi, macd_signal, trend_strength);
        let highlights = build_highlights(rsi, macd_signal, &patterns);

        Opinion {
            score: normalize_score(raw_score),
            confidence: calculate_confidence(&factors),
            highlights,
            sources: vec![
                "tradingview.com".to_string(),
                "coingecko.com".to_string(),
                "binance.com".to_string(),
            ],
            detail: OpinionDetail::Technical {
                levels: KeyLevels {
                    support,
                    resistance,
                },
                patterns,
            },
        }
    }
}

fn detect_patterns(rsi: f64, macd: f64, trend: f64) -> Vec<String> {
    let mut patterns = Vec::new();
    if rsi < 30.0 && macd > 0.0 {
        patterns.push("Bullish Divergence".to_string());
    }
    if rsi > 70.0 && macd < 0.0 {
        patterns.push("Bearish Divergence".to_string());
    }
    if trend > 0.5 {
        patterns.push("Strong Uptrend".to_string());
    }
    if trend < -0.5 {
        patterns.push("Strong Downtrend".to_string());
    }
    if trend.abs() < 0.2 {
        patterns.push("Sideways Consolidation".to_string());
    }
    patterns
}

fn build_highlights(rsi: f64, macd: f64, patterns: &[String]) -> Vec<String> {
    let mut highlights = Vec::new();
    if rsi > 70.0 {
        highlights.push(format!("RSI overbought at {rsi:.1}"));
    }
    if rsi < 30.0 {
        highlights.push(format!("RSI oversold at {rsi:.1}"));
    }
    if macd.abs() > 1.0 {
        let direction = if macd > 0.0 { "bullish" } else { "bearish" };
        highlights.push(format!("Strong MACD {direction} signal"));
    }
    if let Some(first) = patterns.first() {
        highlights.push(format!("Pattern: {first}"));
    }
    highlights
}

#[async_trait]
impl ScoringAgent for TechnicalAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Technical
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<Opinion, AgentError> {
        // An attached chart takes priority over the timeframe-based path.
        if !request.attachments.is_empty() {
            return Ok(self.analyze_chart());
        }

        if let Some(client) = &self.llm {
            match model_opinion(client, self.kind(), request).await {
                Ok(opinion) => return Ok(opinion),
                Err(e) => warn!(agent = %self.kind(), error = %e, "AI path failed, using synthetic"),
            }
        }
        Ok(self.analyze_synthetic(&request.query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juno_models::{Attachment, MarketContext, RiskRegime};

    fn request(query: &str) -> AnalysisRequest {
        AnalysisRequest::new(query, MarketContext::new(RiskRegime::Calm, 10, 10))
    }

    #[tokio::test]
    async fn synthetic_opinion_carries_levels_around_reference_price() {
        let agent = TechnicalAgent::new(None);

        for _ in 0..50 {
            let opinion = agent.analyze(&request("BTC 4h chart")).await.unwrap();
            assert!((-2.0..=2.0).contains(&opinion.score));
            assert!(opinion.confidence <= 100);

            match &opinion.detail {
                OpinionDetail::Technical { levels, .. } => {
                    assert_eq!(levels.support.len(), 3);
                    assert_eq!(levels.resistance.len(), 3);
                    // Nearest support below the BTC reference, nearest resistance above.
                    assert!(levels.support[0] < 45_000.0);
                    assert!(levels.resistance[0] > 45_000.0);
                }
                other => panic!("wrong detail: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn chart_attachment_short_circuits() {
        let agent = TechnicalAgent::new(None);
        let mut req = request("what does this chart say?");
        req.attachments.push(Attachment {
            name: "chart.png".to_string(),
            media_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        });

        let opinion = agent.analyze(&req).await.unwrap();
        assert!((-2.0..=2.0).contains(&opinion.score));
        assert!((60..=90).contains(&opinion.confidence));
        match &opinion.detail {
            OpinionDetail::Technical { patterns, levels } => {
                assert!(!patterns.is_empty());
                assert_eq!(levels.support.len(), 2);
            }
            other => panic!("wrong detail: {other:?}"),
        }
        assert!(opinion.sources.contains(&"Chart Analysis".to_string()));
    }

    #[test]
    fn pattern_detection_rules() {
        assert!(detect_patterns(25.0, 0.5, 0.0).contains(&"Bullish Divergence".to_string()));
        assert!(detect_patterns(80.0, -0.5, 0.0).contains(&"Bearish Divergence".to_string()));
        assert!(detect_patterns(50.0, 0.0, 0.8).contains(&"Strong Uptrend".to_string()));
        assert!(detect_patterns(50.0, 0.0, 0.1).contains(&"Sideways Consolidation".to_string()));
    }
}
