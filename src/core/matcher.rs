use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::models::{MentorCandidate, ScoringWeights, StudentProfile};
use crate::core::{
    filters::dedupe_candidates,
    prompts::{build_ranking_prompt, RANKING_SYSTEM_PROMPT},
    ranking::{parse_ranked_ids, resolve_ranked_ids, DegradeReason, RankingOutcome, RankingService},
    scoring::rank_by_score,
};

/// Maximum number of mentors recommended per request
pub const MAX_MATCHES: usize = 5;

/// Default hard limit on the external ranking call
pub const DEFAULT_RANKING_TIMEOUT: Duration = Duration::from_secs(15);

pub const NO_MENTORS_MESSAGE: &str = "No mentors available at the moment";
pub const AI_UNAVAILABLE_MESSAGE: &str = "AI matching temporarily unavailable";

/// Fault in the deterministic path; never expected for valid input
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("match result violated invariant: {0}")]
    InvariantViolation(String),
}

/// Result of the matching process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub matches: Vec<MentorCandidate>,
    pub ai_powered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MatchResult {
    fn empty() -> Self {
        Self {
            matches: vec![],
            ai_powered: false,
            fallback: None,
            message: Some(NO_MENTORS_MESSAGE.to_string()),
        }
    }

    fn ranked(matches: Vec<MentorCandidate>) -> Self {
        Self {
            matches,
            ai_powered: true,
            fallback: None,
            message: None,
        }
    }

    fn fallback(matches: Vec<MentorCandidate>, reason: &DegradeReason) -> Self {
        Self {
            matches,
            ai_powered: false,
            fallback: Some(true),
            message: reason
                .is_service_outage()
                .then(|| AI_UNAVAILABLE_MESSAGE.to_string()),
        }
    }

    /// Ids of the matched mentors, best first
    pub fn match_ids(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.id.as_str()).collect()
    }

    /// Check the output invariants against the pool the result was built from
    fn verify(&self, pool: &[MentorCandidate]) -> Result<(), MatchError> {
        if self.matches.len() > MAX_MATCHES {
            return Err(MatchError::InvariantViolation(format!(
                "{} matches exceeds limit of {}",
                self.matches.len(),
                MAX_MATCHES
            )));
        }

        if self.matches.is_empty() && !pool.is_empty() {
            return Err(MatchError::InvariantViolation(
                "empty result for non-empty pool".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.matches.len());
        for mentor in &self.matches {
            if !seen.insert(mentor.id.as_str()) {
                return Err(MatchError::InvariantViolation(format!(
                    "mentor {} appears twice",
                    mentor.id
                )));
            }
            if !pool.iter().any(|c| c.id == mentor.id) {
                return Err(MatchError::InvariantViolation(format!(
                    "mentor {} is not in the candidate pool",
                    mentor.id
                )));
            }
        }

        Ok(())
    }
}

/// Mentor matching orchestrator
///
/// # Pipeline Stages
/// 1. Empty pool short-circuit
/// 2. AI ranking (time-bounded, any failure degrades)
/// 3. Deterministic scoring fallback
///
/// Holds no per-request state; clones share the ranking client.
#[derive(Clone)]
pub struct MentorMatcher {
    ranking: Option<Arc<dyn RankingService>>,
    ranking_timeout: Duration,
    weights: ScoringWeights,
}

impl MentorMatcher {
    pub fn new(
        ranking: Option<Arc<dyn RankingService>>,
        ranking_timeout: Duration,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            ranking,
            ranking_timeout,
            weights,
        }
    }

    /// Matcher that always uses the scoring fallback
    pub fn fallback_only(weights: ScoringWeights) -> Self {
        Self::new(None, DEFAULT_RANKING_TIMEOUT, weights)
    }

    pub fn ai_enabled(&self) -> bool {
        self.ranking.is_some()
    }

    /// Recommend up to [`MAX_MATCHES`] mentors for a student
    ///
    /// `candidates` must already be scoped to mentor-eligible, verified members
    /// of the student's institution.
    ///
    /// # Returns
    /// A MatchResult on the happy, empty and degraded paths; an error only
    /// when the produced result breaks an output invariant.
    pub async fn match_mentors(
        &self,
        student: &StudentProfile,
        candidates: Vec<MentorCandidate>,
    ) -> Result<MatchResult, MatchError> {
        let candidates = dedupe_candidates(candidates);

        if candidates.is_empty() {
            tracing::debug!("Empty candidate pool, skipping ranking");
            return Ok(MatchResult::empty());
        }

        let result = match self.attempt_ranking(student, &candidates).await {
            RankingOutcome::Ranked(matches) => {
                tracing::debug!("AI ranking returned {} mentors", matches.len());
                MatchResult::ranked(matches)
            }
            RankingOutcome::Degraded(reason) => {
                tracing::warn!("AI ranking degraded, using score fallback: {}", reason);
                let matches = self.score_fallback(student, &candidates);
                MatchResult::fallback(matches, &reason)
            }
        };

        result.verify(&candidates)?;
        Ok(result)
    }

    /// Deterministic ranking only, without touching the ranking service
    pub fn score_fallback(
        &self,
        student: &StudentProfile,
        candidates: &[MentorCandidate],
    ) -> Vec<MentorCandidate> {
        rank_by_score(student, candidates, &self.weights, MAX_MATCHES)
    }

    async fn attempt_ranking(
        &self,
        student: &StudentProfile,
        candidates: &[MentorCandidate],
    ) -> RankingOutcome {
        let Some(service) = &self.ranking else {
            return RankingOutcome::Degraded(DegradeReason::Disabled);
        };

        let prompt = match build_ranking_prompt(student, candidates, MAX_MATCHES) {
            Ok(prompt) => prompt,
            Err(e) => return RankingOutcome::Degraded(DegradeReason::PromptEncoding(e)),
        };

        let call = service.rank(RANKING_SYSTEM_PROMPT, &prompt);
        let text = match tokio::time::timeout(self.ranking_timeout, call).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return RankingOutcome::Degraded(DegradeReason::Unavailable(e)),
            Err(_) => return RankingOutcome::Degraded(DegradeReason::Timeout(self.ranking_timeout)),
        };

        let ids = match parse_ranked_ids(&text) {
            Ok(ids) => ids,
            Err(e) => return RankingOutcome::Degraded(DegradeReason::Malformed(e)),
        };

        let matches = resolve_ranked_ids(&ids, candidates, MAX_MATCHES);
        if matches.is_empty() {
            RankingOutcome::Degraded(DegradeReason::NoneResolved)
        } else {
            RankingOutcome::Ranked(matches)
        }
    }
}

impl Default for MentorMatcher {
    fn default() -> Self {
        Self::fallback_only(ScoringWeights::default())
    }
}

impl std::fmt::Debug for MentorMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MentorMatcher")
            .field("ai_enabled", &self.ai_enabled())
            .field("ranking_timeout", &self.ranking_timeout)
            .field("weights", &self.weights)
            .finish()
    }
}
