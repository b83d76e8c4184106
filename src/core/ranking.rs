use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use crate::models::MentorCandidate;

/// Errors raised by an external ranking service
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("ranking request failed: {0}")]
    Transport(String),

    #[error("ranking service returned error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("ranking service returned no text")]
    EmptyResponse,

    #[error("ranking service misconfigured: {0}")]
    Misconfigured(String),
}

/// External service that ranks mentors for a student
///
/// Implementations return the raw model text; interpreting it is left to
/// [`parse_ranked_ids`].
#[async_trait]
pub trait RankingService: Send + Sync {
    async fn rank(&self, system: &str, prompt: &str) -> Result<String, RankingError>;
}

/// Errors produced while reading an id list out of ranking text
#[derive(Debug, Error)]
pub enum ResponseParseError {
    #[error("response did not contain a JSON array")]
    MissingArray,

    #[error("response JSON was not an array")]
    NotAnArray,

    #[error("response array was not a list of ids: {0}")]
    InvalidArray(#[from] serde_json::Error),
}

/// Why the AI path was abandoned for a request
#[derive(Debug)]
pub enum DegradeReason {
    Disabled,
    Timeout(Duration),
    Unavailable(RankingError),
    PromptEncoding(serde_json::Error),
    Malformed(ResponseParseError),
    NoneResolved,
}

impl DegradeReason {
    /// Whether the ranking service itself could not be used
    pub fn is_service_outage(&self) -> bool {
        matches!(
            self,
            DegradeReason::Disabled | DegradeReason::Timeout(_) | DegradeReason::Unavailable(_)
        )
    }
}

impl std::fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradeReason::Disabled => write!(f, "ranking service disabled"),
            DegradeReason::Timeout(limit) => write!(f, "ranking timed out after {}ms", limit.as_millis()),
            DegradeReason::Unavailable(e) => write!(f, "{}", e),
            DegradeReason::PromptEncoding(e) => write!(f, "could not encode prompt: {}", e),
            DegradeReason::Malformed(e) => write!(f, "unusable ranking response: {}", e),
            DegradeReason::NoneResolved => write!(f, "no ranked id matched the candidate pool"),
        }
    }
}

/// Result of one pass through the AI path
#[derive(Debug)]
pub enum RankingOutcome {
    Ranked(Vec<MentorCandidate>),
    Degraded(DegradeReason),
}

/// Strip a surrounding code fence from model output
///
/// Handles an optional language tag after the opening fence and a missing
/// closing fence.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the language tag (```json, ```JSON, ...) up to the first newline
    let body = match rest.find('\n') {
        Some(idx) if rest[..idx].chars().all(|c| c.is_ascii_alphanumeric()) => &rest[idx + 1..],
        _ => rest,
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse ranked mentor ids out of raw ranking text
///
/// Accepts a bare JSON array of strings, optionally fenced. When the text is
/// not JSON at all, the outermost `[...]` span is tried, so arrays embedded in
/// prose still parse. JSON that is not an array is rejected.
pub fn parse_ranked_ids(text: &str) -> Result<Vec<String>, ResponseParseError> {
    let cleaned = strip_code_fences(text);

    match serde_json::from_str::<Value>(cleaned) {
        Ok(value @ Value::Array(_)) => Ok(serde_json::from_value(value)?),
        Ok(_) => Err(ResponseParseError::NotAnArray),
        Err(_) => {
            let start = cleaned.find('[');
            let end = cleaned.rfind(']');
            match (start, end) {
                (Some(start), Some(end)) if start < end => {
                    Ok(serde_json::from_str(&cleaned[start..=end])?)
                }
                _ => Err(ResponseParseError::MissingArray),
            }
        }
    }
}

/// Resolve ranked ids against the candidate pool
///
/// Only the first `limit` ids are considered. Ids missing from the pool are
/// dropped and repeated ids are kept once, so the result may be shorter
/// than `limit`.
pub fn resolve_ranked_ids(
    ids: &[String],
    candidates: &[MentorCandidate],
    limit: usize,
) -> Vec<MentorCandidate> {
    let mut resolved: Vec<MentorCandidate> = Vec::with_capacity(limit.min(ids.len()));

    for id in ids.iter().take(limit) {
        if resolved.iter().any(|m| &m.id == id) {
            continue;
        }
        match candidates.iter().find(|c| &c.id == id) {
            Some(candidate) => resolved.push(candidate.clone()),
            None => tracing::debug!("Dropping ranked id not in candidate pool: {}", id),
        }
    }

    resolved
}
