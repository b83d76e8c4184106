use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::{MentorCandidate, StudentProfile};

/// Upper bound on candidates accepted by the stateless rank endpoint
pub const MAX_RANK_CANDIDATES: u64 = 200;

/// Request to rank a caller-supplied candidate pool
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankMentorsRequest {
    pub student: StudentProfile,
    #[serde(default)]
    #[validate(length(max = MAX_RANK_CANDIDATES), custom(function = "validate_candidate_ids"))]
    pub candidates: Vec<MentorCandidate>,
}

fn validate_candidate_ids(candidates: &[MentorCandidate]) -> Result<(), ValidationError> {
    if candidates.iter().any(|c| c.validate().is_err()) {
        return Err(ValidationError::new("empty_candidate_id"));
    }
    Ok(())
}
