use async_trait::async_trait;
use juno_models::{AgentKind, Opinion, OpinionDetail};
use rand::Rng;
use tracing::warn;

use crate::agent::{calculate_confidence, normalize_score, AnalysisRequest, ScoringAgent};
use crate::error::AgentError;
use crate::llm::{model_opinion, LlmClient};
use crate::query::extract_asset;

/// Scores blockchain activity: exchange flows, whale wallets, address
/// activity, and staking participation.
pub struct OnChainAgent {
    llm: Option<LlmClient>,
}

impl OnChainAgent {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    /// Placeholder for exchange-flow and whale-tracking feeds.
    fn analyze_synthetic(&self, query: &str) -> Opinion {
        let mut rng = rand::thread_rng();

        let asset = extract_asset(query);
        let exchange_net_flow = (rng.gen::<f64>() - 0.5) * 1000.0;
        let whale_activity = rng.gen::<f64>() * 100.0;
        let active_addresses = rng.gen::<f64>() * 100.0 + 50.0;
        let staking_ratio = rng.gen::<f64>() * 0.3 + 0.4;

        let flow_score = -exchange_net_flow / 500.0;
        let whale_score = if whale_activity > 70.0 {
            if rng.gen::<f64>() > 0.5 {
                1.0
            } else {
                -1.0
            }
        } else {
            0.0
        };
        let activity_score = (active_addresses - 75.0) / 25.0;
        let staking_score = (staking_ratio - 0.55) * 4.0;

        let raw_score = flow_score * 0.3
            + whale_score * 0.25
            + activity_score * 0.2
            + staking_score * 0.25;
        let factors = [flow_score, whale_score, activity_score, staking_score];

        let flows = flow_observations(exchange_net_flow, whale_activity, active_addresses);
        let contracts = contract_references(&asset);
        let highlights = build_highlights(exchange_net_flow, whale_activity, staking_ratio);

        Opinion {
            score: normalize_score(raw_score),
            confidence: calculate_confidence(&factors),
            highlights,
            sources: vec![
                "glassnode.com".to_string(),
                "nansen.ai".to_string(),
                "dune.com".to_string(),
                "etherscan.io".to_string(),
            ],
            detail: OpinionDetail::OnChain { flows, contracts },
        }
    }
}

fn flow_observations(net_flow: f64, whale_activity: f64, active_addresses: f64) -> Vec<String> {
    let mut flows = Vec::new();

    if net_flow.abs() > 200.0 {
        let direction = if net_flow > 0.0 {
            "Large outflows"
        } else {
            "Large inflows"
        };
        flows.push(format!(
            "{direction} to exchanges ({:.0} BTC)",
            net_flow.abs()
        ));
    }

    if whale_activity > 80.0 {
        flows.push("High whale wallet activity detected".to_string());
    }

    if active_addresses > 85.0 {
        flows.push("Network activity surge".to_string());
    } else if active_addresses < 60.0 {
        flows.push("Low network participation".to_string());
    }

    flows
}

/// Illustrative contract/wallet references for the followed asset.
fn contract_references(asset: &str) -> Vec<String> {
    match asset {
        "ETH" => vec![
            "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984".to_string(),
            "0xa0b86a33e6db436d0f9ab6c6d45e9b72".to_string(),
        ],
        "BTC" => vec![
            "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".to_string(),
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq".to_string(),
        ],
        _ => vec![],
    }
}

fn build_highlights(net_flow: f64, whale_activity: f64, staking_ratio: f64) -> Vec<String> {
    let mut highlights = Vec::new();
    if net_flow > 100.0 {
        highlights.push("Exchange outflows suggest accumulation".to_string());
    }
    if net_flow < -100.0 {
        highlights.push("Exchange inflows indicate selling pressure".to_string());
    }
    if whale_activity > 75.0 {
        highlights.push("Increased whale wallet movements".to_string());
    }
    if staking_ratio > 0.6 {
        highlights.push("High staking ratio reduces liquid supply".to_string());
    }
    if staking_ratio < 0.45 {
        highlights.push("Low staking participation".to_string());
    }
    highlights
}

#[async_trait]
impl ScoringAgent for OnChainAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::OnChain
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<Opinion, AgentError> {
        if let Some(client) = &self.llm {
            match model_opinion(client, self.kind(), request).await {
                Ok(opinion) => return Ok(opinion),
                Err(e) => warn!(agent = %self.kind(), error = %e, "AI path failed, using synthetic"),
            }
        }
        Ok(self.analyze_synthetic(&request.query))
    }
}
