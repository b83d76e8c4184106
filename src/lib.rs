//! Mentor Match - mentor recommendation service for the alumni network
//!
//! Ranks the verified mentors of a student's institution, preferring an
//! external language-model ranking and falling back to a deterministic
//! field-match score whenever that ranking is unavailable or unusable.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{MatchResult, MentorMatcher, RankingService, MAX_MATCHES};
pub use models::{MentorCandidate, ScoringWeights, StudentProfile};
