use std::sync::Arc;
use std::time::Instant;

use juno_models::{
    AgentEvidence, AgentKind, AgentResponse, Attachment, MarketContext, UserProfile,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::agent::{AnalysisRequest, ScoringAgent};
use crate::classifier::{conversational_reply, is_market_analysis_query, select_agents};
use crate::fusion::fuse;

/// The façade external callers invoke: classifier, agent fan-out, fusion,
/// response assembly. One query in flight per instance; each query builds
/// its own request and result set, so no cross-query state is shared.
pub struct Coordinator {
    agents: Vec<Arc<dyn ScoringAgent>>,
}

impl Coordinator {
    pub fn new(agents: Vec<Arc<dyn ScoringAgent>>) -> Self {
        Self { agents }
    }

    /// Process one chat message into a fully-shaped response. Agent
    /// failures degrade the response rather than surfacing; the worst
    /// case is a response with no evidence.
    pub async fn process_query(
        &self,
        query: &str,
        context: MarketContext,
        user_profile: Option<UserProfile>,
        attachments: Vec<Attachment>,
        requested_agents: Option<Vec<AgentKind>>,
    ) -> AgentResponse {
        let request_id = Uuid::new_v4();
        let start = Instant::now();
        info!(%request_id, query_len = query.len(), "Processing query");

        if !is_market_analysis_query(query) && requested_agents.is_none() {
            info!(%request_id, "Conversational short-circuit");
            return AgentResponse::conversational(conversational_reply(query));
        }

        let selected = dedup_kinds(requested_agents.unwrap_or_else(|| select_agents(query)));

        let request = Arc::new(AnalysisRequest {
            query: query.to_string(),
            context: context.clone(),
            user_profile: user_profile.clone(),
            attachments,
        });

        let mut handles = Vec::new();
        for kind in selected {
            let Some(agent) = self.agents.iter().find(|a| a.kind() == kind) else {
                warn!(%request_id, agent = %kind, "Requested agent not configured");
                continue;
            };
            let agent = Arc::clone(agent);
            let request = Arc::clone(&request);
            handles.push(tokio::spawn(async move {
                (kind, agent.analyze(&request).await)
            }));
        }

        // Graceful degradation: a failed agent is logged and dropped, and
        // fusion proceeds with whatever survived. Join order is
        // irrelevant; results carry their agent tag.
        let mut evidence: Vec<AgentEvidence> = Vec::new();
        for handle in handles {
            match handle.await {
                Ok((kind, Ok(opinion))) => {
                    info!(%request_id, agent = %kind, score = opinion.score, confidence = opinion.confidence, "Agent succeeded");
                    evidence.push(AgentEvidence {
                        agent: kind,
                        opinion,
                    });
                }
                Ok((kind, Err(e))) => {
                    warn!(%request_id, agent = %kind, error = %e, "Agent failed, excluded from fusion");
                }
                Err(e) => {
                    error!(%request_id, error = %e, "Agent task panicked");
                }
            }
        }

        if evidence.is_empty() {
            warn!(%request_id, "No surviving agent evidence, returning degraded response");
        }

        let response = fuse(query, evidence, &context, user_profile.as_ref());
        info!(
            %request_id,
            bias = %response.market_view.bias,
            conviction = response.market_view.conviction,
            agents = response.agent_evidence.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Query complete"
        );
        response
    }
}

/// At most one dispatch per agent kind, preserving request order.
fn dedup_kinds(kinds: Vec<AgentKind>) -> Vec<AgentKind> {
    let mut seen = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !seen.contains(&kind) {
            seen.push(kind);
        }
    }
    seen
}
