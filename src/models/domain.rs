use serde::{Deserialize, Serialize};
use validator::Validate;

/// Directory role of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Student,
    Alumni,
    Admin,
    #[serde(other)]
    Unknown,
}

/// Verification status of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Pending,
    Verified,
    #[serde(other)]
    Unknown,
}

/// A member record as stored in the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUser {
    #[serde(rename = "$id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default = "default_status")]
    pub status: MemberStatus,
    #[serde(default)]
    pub institution_id: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_mentor: bool,
}

fn default_status() -> MemberStatus { MemberStatus::Pending }

impl DirectoryUser {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Helper to check the mentor-eligible flag set (Alumni, mentoring, verified)
    pub fn is_mentor_eligible(&self) -> bool {
        self.role == Role::Alumni && self.is_mentor && self.status == MemberStatus::Verified
    }
}

/// Profile fields of the requesting student that the matcher reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

impl From<&DirectoryUser> for StudentProfile {
    fn from(user: &DirectoryUser) -> Self {
        Self {
            major: non_blank(user.major.as_deref()),
            graduation_year: user.graduation_year,
            location: non_blank(user.location.as_deref()),
            industry: non_blank(user.industry.as_deref()),
        }
    }
}

/// A mentor the student may be matched with
///
/// Identity is the `id` alone; two candidates with the same id are the same mentor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MentorCandidate {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl PartialEq for MentorCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MentorCandidate {}

impl From<&DirectoryUser> for MentorCandidate {
    fn from(user: &DirectoryUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.display_name(),
            major: non_blank(user.major.as_deref()),
            industry: non_blank(user.industry.as_deref()),
            location: non_blank(user.location.as_deref()),
        }
    }
}

/// Blank directory values count as absent
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Candidate pool query parameters
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub institution_id: String,
    pub exclude_user_id: Option<String>,
    pub limit: usize,
}

/// Points awarded by the deterministic fallback for each exact field match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub major: u32,
    pub industry: u32,
    pub location: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            major: 100,
            industry: 50,
            location: 25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alumni(major: Option<&str>) -> DirectoryUser {
        DirectoryUser {
            id: "m1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: Role::Alumni,
            status: MemberStatus::Verified,
            institution_id: Some("inst-1".to_string()),
            graduation_year: Some(2015),
            major: major.map(str::to_string),
            industry: Some("  ".to_string()),
            location: Some("NY".to_string()),
            is_mentor: true,
        }
    }

    #[test]
    fn test_candidate_from_directory_user() {
        let candidate = MentorCandidate::from(&alumni(Some("CS")));

        assert_eq!(candidate.id, "m1");
        assert_eq!(candidate.name, "Ada Lovelace");
        assert_eq!(candidate.major.as_deref(), Some("CS"));
        assert_eq!(candidate.industry, None);
        assert_eq!(candidate.location.as_deref(), Some("NY"));
    }

    #[test]
    fn test_padded_values_are_kept_verbatim() {
        let mut mentor = alumni(Some("CS "));
        mentor.location = Some(" NY".to_string());
        let candidate = MentorCandidate::from(&mentor);
        assert_eq!(candidate.major.as_deref(), Some("CS "));
        assert_eq!(candidate.location.as_deref(), Some(" NY"));

        let mut student = alumni(Some("CS"));
        student.role = Role::Student;
        let profile = StudentProfile::from(&student);

        let score = crate::core::calculate_mentor_score(&profile, &candidate, &ScoringWeights::default());
        assert_eq!(score, 0);
    }

    #[test]
    fn test_candidate_identity_is_id_only() {
        let a = MentorCandidate::from(&alumni(Some("CS")));
        let b = MentorCandidate::from(&alumni(Some("Art")));
        assert_eq!(a, b);
    }

    #[test]
    fn test_mentor_eligibility() {
        let mut user = alumni(None);
        assert!(user.is_mentor_eligible());

        user.status = MemberStatus::Pending;
        assert!(!user.is_mentor_eligible());

        user.status = MemberStatus::Verified;
        user.role = Role::Student;
        assert!(!user.is_mentor_eligible());
    }

    #[test]
    fn test_directory_user_deserializes_document() {
        let json = serde_json::json!({
            "$id": "u-42",
            "first_name": "Grace",
            "last_name": "Hopper",
            "role": "Student",
            "status": "Verified",
            "institution_id": "inst-1",
            "major": "CS",
            "$createdAt": "2024-01-01T00:00:00.000+00:00"
        });

        let user: DirectoryUser = serde_json::from_value(json).unwrap();
        assert_eq!(user.id, "u-42");
        assert_eq!(user.role, Role::Student);
        assert!(!user.is_mentor);
        assert_eq!(user.graduation_year, None);
    }

    #[test]
    fn test_unknown_role_is_tolerated() {
        let json = serde_json::json!({ "id": "u-1", "role": "SuperAdmin" });
        let user: DirectoryUser = serde_json::from_value(json).unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert_eq!(user.status, MemberStatus::Pending);
    }
}
