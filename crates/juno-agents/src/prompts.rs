use juno_models::{AgentKind, MarketContext};

use crate::query::extract_asset;

/// Schema example included in every agent system prompt.
fn response_schema() -> String {
    let example = serde_json::json!({
        "score": "<number between -2 (very bearish) and 2 (very bullish)>",
        "confidence": "<number 0-100>",
        "highlights": ["<2-4 key insights>"],
        "sources": ["<relevant data source names>"]
    });
    serde_json::to_string_pretty(&example).unwrap_or_default()
}

pub fn sentiment_system_prompt(asset: &str) -> String {
    format!(
        "You are a cryptocurrency sentiment analysis agent. Analyze market \
         sentiment for {asset}.\n\n\
         Focus on social media sentiment, fear/greed indicators, funding \
         rates, and market psychology.\n\n\
         You MUST respond with ONLY a JSON object matching this schema:\n{}",
        response_schema()
    )
}

pub fn macro_system_prompt() -> String {
    format!(
        "You are a macroeconomic analysis agent for cryptocurrency markets. \
         Analyze macro factors affecting crypto.\n\n\
         Focus on USD strength, interest rates, inflation, risk sentiment, \
         and traditional market correlations.\n\n\
         You MUST respond with ONLY a JSON object matching this schema:\n{}",
        response_schema()
    )
}

pub fn technical_system_prompt(asset: &str, timeframe: &str) -> String {
    format!(
        "You are a technical analysis agent. Analyze {asset} on the \
         {timeframe} timeframe.\n\n\
         Focus on momentum, trend structure, volume, and chart patterns.\n\n\
         You MUST respond with ONLY a JSON object matching this schema:\n{}\n\
         Additionally include:\n\
         - levels: {{\"support\": [numbers], \"resistance\": [numbers]}}\n\
         - patterns: [\"<detected chart patterns>\"]",
        response_schema()
    )
}

pub fn onchain_system_prompt(asset: &str) -> String {
    format!(
        "You are an on-chain analysis agent. Analyze blockchain activity \
         for {asset}.\n\n\
         Focus on exchange flows, whale wallet movements, active addresses, \
         and staking participation.\n\n\
         You MUST respond with ONLY a JSON object matching this schema:\n{}\n\
         Additionally include:\n\
         - flows: [\"<notable flow observations>\"]\n\
         - contracts: [\"<relevant contract or wallet addresses>\"]",
        response_schema()
    )
}

/// The user message shared by every agent's AI-backed path.
pub fn user_message(query: &str, context: &MarketContext) -> String {
    format!(
        "Analyze {} for this query: \"{}\". Current market context: {:?} \
         regime, news heat {}, chain activity {}.",
        extract_asset(query),
        query,
        context.risk_regime,
        context.news_heat,
        context.chain_activity_heat
    )
}

/// System prompt for a given agent kind.
pub fn system_prompt(kind: AgentKind, query: &str) -> String {
    let asset = extract_asset(query);
    match kind {
        AgentKind::Sentiment => sentiment_system_prompt(&asset),
        AgentKind::Macro => macro_system_prompt(),
        AgentKind::Technical => {
            technical_system_prompt(&asset, &crate::query::extract_timeframe(query))
        }
        AgentKind::OnChain => onchain_system_prompt(&asset),
    }
}
