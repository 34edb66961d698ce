use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse market-regime tag that adjusts agent weighting during fusion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskRegime {
    Calm,
    Volatile,
    Crisis,
}

/// Per-query market snapshot supplied by the caller. Read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketContext {
    pub market_clock: DateTime<Utc>,
    pub risk_regime: RiskRegime,
    /// 0-100 news attention gauge.
    pub news_heat: u8,
    /// 0-100 on-chain activity gauge.
    pub chain_activity_heat: u8,
}

impl MarketContext {
    pub fn new(risk_regime: RiskRegime, news_heat: u8, chain_activity_heat: u8) -> Self {
        Self {
            market_clock: Utc::now(),
            risk_regime,
            news_heat: news_heat.min(100),
            chain_activity_heat: chain_activity_heat.min(100),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTolerance::Low => write!(f, "low"),
            RiskTolerance::Medium => write!(f, "medium"),
            RiskTolerance::High => write!(f, "high"),
        }
    }
}

/// Research-credit tier from the staking program.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StakingTier {
    Free,
    Analyst,
    Pro,
    Fund,
}

/// Optional caller profile, used only to phrase recommendation fit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Free-text objective (e.g., "grow a long-term core position").
    pub objective: String,
    /// Investment horizon hint (e.g., "weeks", "months").
    pub horizon: String,
    pub risk_tolerance: RiskTolerance,
    pub assets_followed: Vec<String>,
    pub staking_tier: StakingTier,
}

/// An uploaded file accompanying a query (e.g., a chart screenshot).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub name: String,
    /// MIME type as reported by the uploader (e.g., "image/png").
    pub media_type: String,
    pub bytes: Vec<u8>,
}
