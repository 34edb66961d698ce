//! Juno - agent coordination and evidence-fusion engine for crypto
//! research chat.
//!
//! A query classifier routes chit-chat to canned replies; market queries
//! fan out to four scoring agents (sentiment, macro, technical, on-chain)
//! whose opinions are fused into one ranked, cited market view.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use juno::models::{JunoConfig, MarketContext, RiskRegime};
//!
//! # async fn run() {
//! let config = JunoConfig::default();
//! let coordinator = juno::build_coordinator(&config);
//! let context = MarketContext::new(RiskRegime::Calm, 20, 15);
//! let response = juno::process_query(&coordinator, "BTC sentiment", context).await;
//! println!("{}", response.summary);
//! # }
//! ```

pub use juno_agents as agents;
pub use juno_models as models;

use std::sync::Arc;
use std::time::Duration;

use juno_agents::{
    Coordinator, LlmClient, LlmConfig, MacroAgent, OnChainAgent, ScoringAgent, SentimentAgent,
    TechnicalAgent,
};
use juno_models::config::JunoConfig;
use juno_models::{AgentKind, AgentResponse, MarketContext};

/// Build a Coordinator from configuration. Each enabled agent gets its own
/// model client when a credential is configured; without one, every agent
/// runs its synthetic path.
pub fn build_coordinator(config: &JunoConfig) -> Coordinator {
    let timeout = Duration::from_secs(config.agents.agent_timeout_seconds);
    let llm = config.agents.api_key.as_ref().map(|key| {
        LlmClient::new(LlmConfig::new(
            key.clone(),
            config.agents.model.clone(),
            timeout,
        ))
    });

    let agents: Vec<Arc<dyn ScoringAgent>> = config
        .agents
        .agents
        .iter()
        .filter(|a| a.enabled)
        .map(|a| match a.kind {
            AgentKind::Sentiment => {
                Arc::new(SentimentAgent::new(llm.clone())) as Arc<dyn ScoringAgent>
            }
            AgentKind::Macro => Arc::new(MacroAgent::new(llm.clone())) as Arc<dyn ScoringAgent>,
            AgentKind::Technical => {
                Arc::new(TechnicalAgent::new(llm.clone())) as Arc<dyn ScoringAgent>
            }
            AgentKind::OnChain => Arc::new(OnChainAgent::new(llm.clone())) as Arc<dyn ScoringAgent>,
        })
        .collect();

    Coordinator::new(agents)
}

/// Process a single query with no profile, attachments, or agent override.
pub async fn process_query(
    coordinator: &Coordinator,
    query: &str,
    context: MarketContext,
) -> AgentResponse {
    coordinator
        .process_query(query, context, None, vec![], None)
        .await
}
