use juno_models::AgentKind;
use rand::seq::SliceRandom;

/// Keyword gate for routing a message into the analytical pipeline.
/// Substring-based by design; false negatives on novel phrasing are
/// acceptable.
const MARKET_KEYWORDS: &[&str] = &[
    "btc", "eth", "bitcoin", "ethereum", "crypto", "price", "chart", "analysis", "sentiment",
    "macro", "onchain", "technical", "trading", "forecast", "bullish", "bearish", "support",
    "resistance", "trend", "market", "doge", "sol", "ada", "dot", "link", "avax", "matic", "arb",
    "whale", "flow", "fed", "rate", "volatility", "volume",
];

/// Longer messages are more likely to be analysis requests.
const ANALYSIS_LENGTH_THRESHOLD: usize = 50;

pub fn is_market_analysis_query(query: &str) -> bool {
    let query_lower = query.to_lowercase();
    MARKET_KEYWORDS.iter().any(|k| query_lower.contains(k))
        || query.starts_with('/')
        || query.len() > ANALYSIS_LENGTH_THRESHOLD
}

const GREETING_REPLIES: &[&str] = &[
    "Hello! I'm Juno, your AI crypto analyst. Ask me about any cryptocurrency, upload charts \
     for analysis, or use slash commands like /sentiment or /macro.",
    "Hi there! Ready to dive into some crypto analysis? I can help with sentiment, technical \
     analysis, on-chain data, and more.",
    "Hey! What crypto would you like to analyze today? I have access to sentiment, macro, \
     technical, and on-chain data.",
];

const THANKS_REPLIES: &[&str] = &[
    "You're welcome! Feel free to ask about any crypto assets or market analysis.",
    "Happy to help! Let me know if you need analysis on any specific cryptocurrencies.",
    "Glad I could assist! What else would you like to explore in the crypto markets?",
];

const GENERAL_REPLIES: &[&str] = &[
    "I'm here to help with cryptocurrency analysis! Try asking about a specific coin like BTC \
     or ETH, or use slash commands for detailed analysis.",
    "I can analyze crypto markets using sentiment, macro, technical, and on-chain data. What \
     would you like to explore?",
    "Feel free to ask about any cryptocurrency or upload charts for analysis. I'm here to \
     help with your crypto research!",
];

/// Canned reply for chit-chat, selected by substring pool then randomly
/// within the pool.
pub fn conversational_reply(query: &str) -> String {
    let query_lower = query.to_lowercase();

    let pool: &[&str] = if query_lower.contains("hello")
        || query_lower.contains("hi")
        || query_lower.contains("hey")
    {
        GREETING_REPLIES
    } else if query_lower.contains("thank") {
        THANKS_REPLIES
    } else {
        GENERAL_REPLIES
    };

    let mut rng = rand::thread_rng();
    pool.choose(&mut rng)
        .copied()
        .unwrap_or(GENERAL_REPLIES[0])
        .to_string()
}

/// Keyword rulesets mapping a query to the agents it implicates. An empty
/// match selects all four.
pub fn select_agents(query: &str) -> Vec<AgentKind> {
    let query_lower = query.to_lowercase();
    let mut selected = Vec::new();

    if ["price", "chart", "level"]
        .iter()
        .any(|k| query_lower.contains(k))
    {
        selected.push(AgentKind::Technical);
    }
    if ["sentiment", "social", "fear"]
        .iter()
        .any(|k| query_lower.contains(k))
    {
        selected.push(AgentKind::Sentiment);
    }
    if ["macro", "fed", "rate"]
        .iter()
        .any(|k| query_lower.contains(k))
    {
        selected.push(AgentKind::Macro);
    }
    if ["onchain", "whale", "flow"]
        .iter()
        .any(|k| query_lower.contains(k))
    {
        selected.push(AgentKind::OnChain);
    }

    if selected.is_empty() {
        selected.extend(AgentKind::ALL);
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_greeting_is_conversational() {
        assert!(!is_market_analysis_query("hi"));
        assert!(!is_market_analysis_query("how are you?"));
    }

    #[test]
    fn slash_commands_route_to_analysis() {
        assert!(is_market_analysis_query("/chart"));
        assert!(is_market_analysis_query("/sentiment"));
    }

    #[test]
    fn keyword_queries_route_to_analysis() {
        assert!(is_market_analysis_query("BTC sentiment right now"));
        assert!(is_market_analysis_query("is the fed pausing?"));
    }

    #[test]
    fn long_queries_route_to_analysis() {
        let query = "what do you make of the situation we find ourselves in today?";
        assert!(query.len() > 50);
        assert!(is_market_analysis_query(query));
    }

    #[test]
    fn greeting_reply_comes_from_greeting_pool() {
        for _ in 0..10 {
            let reply = conversational_reply("hello!");
            assert!(GREETING_REPLIES.contains(&reply.as_str()));
        }
    }

    #[test]
    fn thanks_reply_comes_from_thanks_pool() {
        let reply = conversational_reply("ok thanks");
        assert!(THANKS_REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn unmatched_chitchat_gets_general_reply() {
        let reply = conversational_reply("ok");
        assert!(GENERAL_REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn selection_rulesets_match_domains() {
        assert_eq!(select_agents("show me the chart"), vec![AgentKind::Technical]);
        assert_eq!(
            select_agents("social media fear index"),
            vec![AgentKind::Sentiment]
        );
        assert_eq!(select_agents("fed rate path"), vec![AgentKind::Macro]);
        assert_eq!(select_agents("whale flows today"), vec![AgentKind::OnChain]);
    }

    #[test]
    fn multiple_rulesets_can_fire() {
        let selected = select_agents("price action and whale flows");
        assert!(selected.contains(&AgentKind::Technical));
        assert!(selected.contains(&AgentKind::OnChain));
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn no_ruleset_match_selects_all_agents() {
        assert_eq!(select_agents("tell me about ADA"), AgentKind::ALL.to_vec());
    }
}
