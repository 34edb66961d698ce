//! Deterministic stub agents for exercising the coordinator and fusion
//! engine without the randomized implementations.

use async_trait::async_trait;
use juno_models::{AgentKind, KeyLevels, Opinion, OpinionDetail};

use crate::agent::{AnalysisRequest, ScoringAgent};
use crate::error::AgentError;

/// A scoring agent that returns a fixed opinion, or always fails.
pub struct StubAgent {
    kind: AgentKind,
    opinion: Opinion,
    should_fail: bool,
}

impl StubAgent {
    /// Stub returning a base opinion with the given score and confidence.
    pub fn scoring(kind: AgentKind, score: f64, confidence: u8) -> Self {
        let detail = match kind {
            AgentKind::Technical => OpinionDetail::Technical {
                levels: KeyLevels::default(),
                patterns: vec![],
            },
            AgentKind::OnChain => OpinionDetail::OnChain {
                flows: vec![],
                contracts: vec![],
            },
            _ => OpinionDetail::Base,
        };
        Self::with_opinion(
            kind,
            Opinion {
                score,
                confidence,
                highlights: vec![format!("Stub {kind} analysis")],
                sources: vec![format!("stub_{kind}_feed")],
                detail,
            },
        )
    }

    /// Stub returning exactly the given opinion.
    pub fn with_opinion(kind: AgentKind, opinion: Opinion) -> Self {
        Self {
            kind,
            opinion,
            should_fail: false,
        }
    }

    /// Stub whose `analyze` always errors.
    pub fn failing(kind: AgentKind) -> Self {
        let mut stub = Self::scoring(kind, 0.0, 0);
        stub.should_fail = true;
        stub
    }
}

#[async_trait]
impl ScoringAgent for StubAgent {
    fn kind(&self) -> AgentKind {
        self.kind
    }

    async fn analyze(&self, _request: &AnalysisRequest) -> Result<Opinion, AgentError> {
        if self.should_fail {
            return Err(AgentError::Api("stub failure".to_string()));
        }
        Ok(self.opinion.clone())
    }
}
