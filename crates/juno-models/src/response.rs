use serde::{Deserialize, Serialize};

use crate::opinion::{AgentEvidence, KeyLevels};

/// Directional label derived from the composite score via fixed thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bias::Bullish => write!(f, "bullish"),
            Bias::Bearish => write!(f, "bearish"),
            Bias::Neutral => write!(f, "neutral"),
        }
    }
}

/// The fused directional view for one asset and timeframe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketView {
    pub asset: String,
    pub timeframe: String,
    pub bias: Bias,
    /// 0-100, combining composite magnitude and average agent confidence.
    pub conviction: u8,
    pub key_levels: KeyLevels,
    pub catalysts: Vec<String>,
    pub risks: Vec<String>,
}

impl MarketView {
    /// The shape attached to conversational and degraded responses.
    pub fn empty() -> Self {
        Self {
            asset: String::new(),
            timeframe: String::new(),
            bias: Bias::Neutral,
            conviction: 0,
            key_levels: KeyLevels::default(),
            catalysts: vec![],
            risks: vec![],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Idea,
    Hedge,
    Rebalance,
    Alert,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeHorizon {
    Intraday,
    Swing,
    Position,
}

/// A trade idea derived from the fused view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub entry_zone: String,
    pub invalidation: String,
    pub targets: Vec<String>,
    /// Risk/reward estimate.
    pub r_r: f64,
    /// 0.0-1.0 model-based win estimate.
    pub probability_win: f64,
    pub time_horizon: TimeHorizon,
    pub sizing_guidance: String,
    pub fit_for_user: String,
}

/// Illustrative historical-performance summary. Synthetic; a real system
/// would source this from a backtest service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestSnapshot {
    pub strategy_id: String,
    pub sample_period: String,
    pub n_trades: u32,
    pub win_rate: f64,
    pub expectancy: f64,
    pub max_dd: f64,
    pub notes: String,
}

impl BacktestSnapshot {
    pub fn empty() -> Self {
        Self {
            strategy_id: String::new(),
            sample_period: String::new(),
            n_trades: 0,
            win_rate: 0.0,
            expectancy: 0.0,
            max_dd: 0.0,
            notes: String::new(),
        }
    }
}

/// The aggregate root returned to the caller. The core holds no reference
/// to it after return.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentResponse {
    pub summary: String,
    pub market_view: MarketView,
    pub recommendations: Vec<Recommendation>,
    pub agent_evidence: Vec<AgentEvidence>,
    pub backtest_snapshot: BacktestSnapshot,
    pub disclosures: Vec<String>,
}

impl AgentResponse {
    /// A fully-shaped response carrying only a chat reply. Callers never
    /// need to special-case conversational turns.
    pub fn conversational(summary: String) -> Self {
        Self {
            summary,
            market_view: MarketView::empty(),
            recommendations: vec![],
            agent_evidence: vec![],
            backtest_snapshot: BacktestSnapshot::empty(),
            disclosures: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opinion::{AgentKind, Opinion, OpinionDetail};

    fn sample_response() -> AgentResponse {
        AgentResponse {
            summary: "BTC shows bullish bias with 68% conviction based on 2 agent analysis. \
                      2/2 agents agree on direction."
                .to_string(),
            market_view: MarketView {
                asset: "BTC".to_string(),
                timeframe: "1d".to_string(),
                bias: Bias::Bullish,
                conviction: 68,
                key_levels: KeyLevels {
                    support: vec![42750.0, 41400.0, 39600.0],
                    resistance: vec![47250.0, 48600.0, 50400.0],
                },
                catalysts: vec!["High news attention".to_string()],
                risks: vec!["High volatility environment".to_string()],
            },
            recommendations: vec![Recommendation {
                kind: RecommendationKind::Idea,
                entry_zone: "42750 - 41400".to_string(),
                invalidation: "Close below 41400".to_string(),
                targets: vec!["47250".to_string(), "48600".to_string()],
                r_r: 2.1,
                probability_win: 0.544,
                time_horizon: TimeHorizon::Swing,
                sizing_guidance: "3% of portfolio".to_string(),
                fit_for_user: "Standard swing trading setup".to_string(),
            }],
            agent_evidence: vec![AgentEvidence {
                agent: AgentKind::Sentiment,
                opinion: Opinion {
                    score: 1.1,
                    confidence: 70,
                    highlights: vec!["Extreme greed detected".to_string()],
                    sources: vec!["cryptofear.com".to_string()],
                    detail: OpinionDetail::Base,
                },
            }],
            backtest_snapshot: BacktestSnapshot {
                strategy_id: "btc_bullish_1700000000".to_string(),
                sample_period: "2023-01 to 2024-12".to_string(),
                n_trades: 41,
                win_rate: 0.66,
                expectancy: 0.12,
                max_dd: 0.09,
                notes: "Based on similar market conditions and agent consensus".to_string(),
            },
            disclosures: vec![
                "This is research, not financial advice.".to_string(),
                "Probabilities are model-based estimates and may change.".to_string(),
                "Past performance does not guarantee future results.".to_string(),
            ],
        }
    }

    #[test]
    fn roundtrip_agent_response() {
        let response = sample_response();
        let json = serde_json::to_string(&response).unwrap();
        let deserialized: AgentResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(response, deserialized);
    }

    #[test]
    fn recommendation_type_field_name() {
        let response = sample_response();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["recommendations"][0]["type"], "idea");
        assert_eq!(json["recommendations"][0]["time_horizon"], "swing");
    }

    #[test]
    fn conversational_response_is_fully_shaped() {
        let response = AgentResponse::conversational("Hi there!".to_string());
        assert_eq!(response.market_view, MarketView::empty());
        assert!(response.recommendations.is_empty());
        assert!(response.agent_evidence.is_empty());
        assert_eq!(response.backtest_snapshot, BacktestSnapshot::empty());

        // Shape survives serialization with every field present.
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("market_view").is_some());
        assert!(json.get("backtest_snapshot").is_some());
        assert!(json.get("disclosures").is_some());
    }

    #[test]
    fn bias_serialization() {
        assert_eq!(serde_json::to_string(&Bias::Bullish).unwrap(), "\"bullish\"");
        assert_eq!(serde_json::to_string(&Bias::Neutral).unwrap(), "\"neutral\"");
    }
}
