// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CandidateQuery, DirectoryUser, MemberStatus, MentorCandidate, Role, ScoringWeights, StudentProfile};
pub use requests::{RankMentorsRequest, MAX_RANK_CANDIDATES};
pub use responses::{ErrorResponse, HealthResponse};
