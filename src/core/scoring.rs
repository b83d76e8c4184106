use crate::models::{MentorCandidate, ScoringWeights, StudentProfile};

/// Calculate the fallback score of a mentor for a student
///
/// Scoring formula:
/// score = (
///     major_points +      # candidate.major == student.major
///     industry_points +   # candidate.industry == student.industry
///     location_points     # candidate.location == student.location
/// )
///
/// Comparisons are exact and case-sensitive. An absent value on either side
/// never matches. The sum saturates at `u32::MAX`.
pub fn calculate_mentor_score(
    student: &StudentProfile,
    candidate: &MentorCandidate,
    weights: &ScoringWeights,
) -> u32 {
    let mut score: u32 = 0;

    if same_value(&student.major, &candidate.major) {
        score = score.saturating_add(weights.major);
    }
    if same_value(&student.industry, &candidate.industry) {
        score = score.saturating_add(weights.industry);
    }
    if same_value(&student.location, &candidate.location) {
        score = score.saturating_add(weights.location);
    }

    score
}

#[inline]
fn same_value(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

/// Rank candidates by fallback score, best first, keeping at most `limit`
///
/// Uses a stable sort so equal-score candidates keep their pool order and the
/// output is reproducible for a given input.
pub fn rank_by_score(
    student: &StudentProfile,
    candidates: &[MentorCandidate],
    weights: &ScoringWeights,
    limit: usize,
) -> Vec<MentorCandidate> {
    let mut scored: Vec<(u32, &MentorCandidate)> = candidates
        .iter()
        .map(|candidate| (calculate_mentor_score(student, candidate, weights), candidate))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}
