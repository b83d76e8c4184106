use serde::Serialize;
use crate::models::{MentorCandidate, StudentProfile};

/// System prompt for mentor ranking calls
pub const RANKING_SYSTEM_PROMPT: &str = "You match university students with alumni mentors. \
Weigh major, industry, location and career goals, and answer with JSON only.";

#[derive(Serialize)]
struct MentorSummary<'a> {
    id: &'a str,
    name: &'a str,
    major: Option<&'a str>,
    industry: Option<&'a str>,
    location: Option<&'a str>,
}

impl<'a> From<&'a MentorCandidate> for MentorSummary<'a> {
    fn from(candidate: &'a MentorCandidate) -> Self {
        Self {
            id: &candidate.id,
            name: &candidate.name,
            major: candidate.major.as_deref(),
            industry: candidate.industry.as_deref(),
            location: candidate.location.as_deref(),
        }
    }
}

/// Build the user prompt asking for a ranked list of at most `limit` mentor ids
pub fn build_ranking_prompt(
    student: &StudentProfile,
    candidates: &[MentorCandidate],
    limit: usize,
) -> Result<String, serde_json::Error> {
    let student_json = serde_json::to_string(student)?;
    let mentors: Vec<MentorSummary<'_>> = candidates.iter().map(MentorSummary::from).collect();
    let mentors_json = serde_json::to_string(&mentors)?;

    Ok(format!(
        r#"Student profile: {student_json}
Candidate mentors: {mentors_json}

Rank the {limit} best mentors for this student, considering in order:
1. Alignment between the student's major and the mentor's major
2. Relevance of the mentor's industry to the student's interests
3. Geographic proximity
4. Potential to support the student's career progression

Respond with ONLY a JSON array of mentor ids, best match first, e.g. ["id-a", "id-b"]."#
    ))
}
