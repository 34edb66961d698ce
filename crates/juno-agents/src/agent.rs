use async_trait::async_trait;
use juno_models::{AgentKind, Attachment, MarketContext, Opinion, UserProfile};

use crate::error::AgentError;

/// Everything an agent sees for one query. Built once by the coordinator
/// and shared read-only across the fan-out.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub query: String,
    pub context: MarketContext,
    pub user_profile: Option<UserProfile>,
    pub attachments: Vec<Attachment>,
}

impl AnalysisRequest {
    pub fn new(query: impl Into<String>, context: MarketContext) -> Self {
        Self {
            query: query.into(),
            context,
            user_profile: None,
            attachments: vec![],
        }
    }
}

/// The scoring contract. Every agent turns a query and market context into
/// a bounded opinion; the fusion engine treats implementations
/// polymorphically. Mockable for testing.
#[async_trait]
pub trait ScoringAgent: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Must complete or fail within the agent's configured timeout. An
    /// error excludes the agent from fusion; it is not retried within the
    /// same query.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<Opinion, AgentError>;
}

/// Linear clamp to [-2, 2]. No rescaling.
pub fn normalize_score(raw: f64) -> f64 {
    raw.clamp(-2.0, 2.0)
}

/// Confidence from the convergence of an agent's sub-signals: low variance
/// means the factors agree internally. `100 - 50 * variance`, clamped to
/// [0, 100]. A heuristic, not a probability.
pub fn calculate_confidence(factors: &[f64]) -> u8 {
    if factors.is_empty() {
        return 0;
    }
    let mean = factors.iter().sum::<f64>() / factors.len() as f64;
    let variance =
        factors.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / factors.len() as f64;
    (100.0 - variance * 50.0).clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_both_ends() {
        assert_eq!(normalize_score(3.7), 2.0);
        assert_eq!(normalize_score(-9.0), -2.0);
        assert_eq!(normalize_score(0.45), 0.45);
        assert_eq!(normalize_score(2.0), 2.0);
    }

    #[test]
    fn identical_factors_give_full_confidence() {
        assert_eq!(calculate_confidence(&[0.5, 0.5, 0.5]), 100);
    }

    #[test]
    fn diverging_factors_lower_confidence() {
        // Factors at -2 and 2: variance = 4, so 100 - 200 clamps to 0.
        assert_eq!(calculate_confidence(&[-2.0, 2.0]), 0);

        // Mild spread stays in range: [-0.5, 0.5] has variance 0.25.
        assert_eq!(calculate_confidence(&[-0.5, 0.5]), 88);
    }

    #[test]
    fn empty_factor_list_is_zero_confidence() {
        assert_eq!(calculate_confidence(&[]), 0);
    }

    #[test]
    fn confidence_always_in_bounds() {
        let cases: [&[f64]; 4] = [
            &[1.9, -1.9, 0.0],
            &[0.0],
            &[2.0, 2.0, -2.0, -2.0],
            &[0.1, 0.2, 0.3, 0.4],
        ];
        for factors in cases {
            let confidence = calculate_confidence(factors);
            assert!(confidence <= 100);
        }
    }
}
