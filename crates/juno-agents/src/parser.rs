use juno_models::{AgentKind, KeyLevels, Opinion, OpinionDetail};
use serde::Deserialize;

use crate::agent::normalize_score;
use crate::error::AgentError;

/// Extract the first JSON object from model output that may carry
/// surrounding prose or a markdown fence.
pub fn extract_json(text: &str) -> Result<String, AgentError> {
    if let Some(fenced) = fenced_block(text) {
        if serde_json::from_str::<serde_json::Value>(&fenced).is_ok() {
            return Ok(fenced);
        }
    }

    if let Some(object) = first_balanced_object(text) {
        if serde_json::from_str::<serde_json::Value>(&object).is_ok() {
            return Ok(object);
        }
    }

    Err(AgentError::Parse(format!(
        "No valid JSON object in model output (length={})",
        text.len()
    )))
}

fn fenced_block(text: &str) -> Option<String> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // Skip an optional language tag on the fence line.
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim().to_string())
}

/// Scan for the first balanced `{ ... }`, ignoring braces inside strings.
fn first_balanced_object(text: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(s) = start {
                        return Some(text[s..=i].to_string());
                    }
                }
            }
            _ => {}
        }
    }

    None
}

/// The contract shape agents instruct the model to emit. Kind-specific
/// fields are optional here; `parse_opinion` routes them by agent kind.
#[derive(Debug, Deserialize)]
struct RawOpinion {
    score: f64,
    confidence: f64,
    #[serde(default)]
    highlights: Vec<String>,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    levels: Option<KeyLevels>,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    flows: Vec<String>,
    #[serde(default)]
    contracts: Vec<String>,
}

/// Parse raw model output into a clamped, kind-tagged opinion.
pub fn parse_opinion(raw: &str, kind: AgentKind) -> Result<Opinion, AgentError> {
    let json = extract_json(raw)?;
    let parsed: RawOpinion = serde_json::from_str(&json)
        .map_err(|e| AgentError::Parse(format!("Contract mismatch: {e}\nJSON: {json}")))?;

    let detail = match kind {
        AgentKind::Technical => OpinionDetail::Technical {
            levels: parsed.levels.unwrap_or_default(),
            patterns: parsed.patterns,
        },
        AgentKind::OnChain => OpinionDetail::OnChain {
            flows: parsed.flows,
            contracts: parsed.contracts,
        },
        AgentKind::Sentiment | AgentKind::Macro => OpinionDetail::Base,
    };

    let sources = if parsed.sources.is_empty() {
        vec!["AI Analysis".to_string()]
    } else {
        parsed.sources
    };

    Ok(Opinion {
        score: normalize_score(parsed.score),
        confidence: parsed.confidence.clamp(0.0, 100.0).round() as u8,
        highlights: parsed.highlights,
        sources,
        detail,
    })
}
