use serde::{Deserialize, Serialize};

/// The four scoring agents the coordinator can dispatch to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Sentiment,
    Macro,
    Technical,
    #[serde(rename = "onchain")]
    OnChain,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Sentiment,
        AgentKind::Macro,
        AgentKind::Technical,
        AgentKind::OnChain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Sentiment => "sentiment",
            AgentKind::Macro => "macro",
            AgentKind::Technical => "technical",
            AgentKind::OnChain => "onchain",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Support and resistance price levels, nearest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeyLevels {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
}

/// Kind-specific payload carried alongside the base opinion fields.
///
/// The discriminant forces consumers to branch exhaustively instead of
/// probing optional fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpinionDetail {
    Base,
    Technical {
        levels: KeyLevels,
        patterns: Vec<String>,
    },
    #[serde(rename = "onchain")]
    OnChain {
        flows: Vec<String>,
        contracts: Vec<String>,
    },
}

/// A single agent's bounded market opinion. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Opinion {
    /// Directional score, clamped to [-2, 2].
    pub score: f64,
    /// 0-100 convergence heuristic, not a probability.
    pub confidence: u8,
    pub highlights: Vec<String>,
    pub sources: Vec<String>,
    #[serde(flatten)]
    pub detail: OpinionDetail,
}

impl Opinion {
    pub fn key_levels(&self) -> Option<&KeyLevels> {
        match &self.detail {
            OpinionDetail::Technical { levels, .. } => Some(levels),
            _ => None,
        }
    }
}

/// An opinion tagged with the agent that produced it, as joined by fusion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentEvidence {
    pub agent: AgentKind,
    #[serde(flatten)]
    pub opinion: Opinion,
}
