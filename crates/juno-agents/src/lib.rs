pub mod agent;
pub mod classifier;
pub mod coordinator;
pub mod error;
pub mod fusion;
pub mod llm;
pub mod macro_economic;
pub mod onchain;
pub mod parser;
pub mod prompts;
pub mod query;
pub mod sentiment;
pub mod technical;

pub mod test_support;

pub use agent::{AnalysisRequest, ScoringAgent};
pub use coordinator::Coordinator;
pub use error::AgentError;
pub use llm::{LlmClient, LlmConfig};
pub use macro_economic::MacroAgent;
pub use onchain::OnChainAgent;
pub use sentiment::SentimentAgent;
pub use technical::TechnicalAgent;
