use serde::{Deserialize, Serialize};

use crate::opinion::AgentKind;

/// Top-level configuration for Juno.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JunoConfig {
    pub agents: AgentsConfig,
}

/// Configuration for the agent coordination layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentsConfig {
    /// Per-agent analysis timeout in seconds.
    pub agent_timeout_seconds: u64,
    /// Model used by the AI-backed analysis path.
    pub model: String,
    /// API credential for the model endpoint. None disables the AI path
    /// and every agent runs its synthetic fallback.
    pub api_key: Option<String>,
    pub agents: Vec<AgentConfig>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            agent_timeout_seconds: 5,
            model: "claude-3-5-haiku-latest".to_string(),
            api_key: None,
            agents: AgentKind::ALL
                .iter()
                .map(|&kind| AgentConfig {
                    kind,
                    enabled: true,
                })
                .collect(),
        }
    }
}

/// Configuration for a single scoring agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub kind: AgentKind,
    pub enabled: bool,
}
