use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Model API error: {0}")]
    Api(String),

    #[error("Opinion parse error: {0}")]
    Parse(String),

    #[error("Agent timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
