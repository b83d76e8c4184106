use std::collections::HashSet;
use crate::models::{DirectoryUser, MentorCandidate};

/// Check if a directory member belongs in an institution's mentor pool
///
/// The directory query already applies these constraints server-side; this
/// re-check guards against documents the store returns regardless.
#[inline]
pub fn matches_pool_constraints(
    user: &DirectoryUser,
    institution_id: &str,
    exclude_user_id: Option<&str>,
) -> bool {
    if !user.is_mentor_eligible() {
        return false;
    }

    if user.institution_id.as_deref() != Some(institution_id) {
        return false;
    }

    if exclude_user_id == Some(user.id.as_str()) {
        return false;
    }

    true
}

/// Collapse candidates sharing an id down to their first occurrence
pub fn dedupe_candidates(candidates: Vec<MentorCandidate>) -> Vec<MentorCandidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.id.clone()))
        .collect()
}
