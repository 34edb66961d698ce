pub mod config;
pub mod context;
pub mod opinion;
pub mod response;

pub use config::{AgentConfig, AgentsConfig, JunoConfig};
pub use context::{Attachment, MarketContext, RiskRegime, RiskTolerance, StakingTier, UserProfile};
pub use opinion::{AgentEvidence, AgentKind, KeyLevels, Opinion, OpinionDetail};
pub use response::{
    AgentResponse, BacktestSnapshot, Bias, MarketView, Recommendation, RecommendationKind,
    TimeHorizon,
};
