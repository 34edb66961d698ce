use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use juno_models::config::JunoConfig;
use juno_models::{AgentKind, MarketContext, RiskRegime};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "juno", about = "Juno crypto-research agent coordinator")]
struct Cli {
    /// The query to analyze. Reads stdin when omitted.
    query: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config/juno.toml")]
    config: String,

    /// Market risk regime: calm, volatile, or crisis
    #[arg(long, default_value = "calm")]
    regime: String,

    /// News attention gauge, 0-100
    #[arg(long, default_value_t = 0)]
    news_heat: u8,

    /// On-chain activity gauge, 0-100
    #[arg(long, default_value_t = 0)]
    chain_heat: u8,

    /// Comma-separated agent override (sentiment,macro,technical,onchain)
    #[arg(long)]
    agents: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

fn parse_regime(value: &str) -> Result<RiskRegime> {
    match value.to_lowercase().as_str() {
        "calm" => Ok(RiskRegime::Calm),
        "volatile" => Ok(RiskRegime::Volatile),
        "crisis" => Ok(RiskRegime::Crisis),
        other => bail!("Unknown risk regime: {other}"),
    }
}

fn parse_agents(value: &str) -> Result<Vec<AgentKind>> {
    value
        .split(',')
        .map(|part| match part.trim().to_lowercase().as_str() {
            "sentiment" => Ok(AgentKind::Sentiment),
            "macro" => Ok(AgentKind::Macro),
            "technical" => Ok(AgentKind::Technical),
            "onchain" => Ok(AgentKind::OnChain),
            other => bail!("Unknown agent: {other}"),
        })
        .collect()
}

fn load_config(path: &str) -> Result<JunoConfig> {
    if !Path::new(path).exists() {
        return Ok(JunoConfig::default());
    }
    let config_str =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    toml::from_str(&config_str).with_context(|| "Failed to parse config")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    // The credential is resolved here and injected; the core never reads
    // the environment itself.
    if config.agents.api_key.is_none() {
        config.agents.api_key = std::env::var("ANTHROPIC_API_KEY").ok();
    }

    let query = if let Some(query) = cli.query {
        query
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf.trim().to_string()
    };
    if query.is_empty() {
        bail!("Empty query");
    }

    let context = MarketContext::new(parse_regime(&cli.regime)?, cli.news_heat, cli.chain_heat);
    let requested_agents = cli.agents.as_deref().map(parse_agents).transpose()?;

    let coordinator = juno::build_coordinator(&config);
    let response = coordinator
        .process_query(&query, context, None, vec![], requested_agents)
        .await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    Ok(())
}
