// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod prompts;
pub mod ranking;
pub mod scoring;

pub use filters::{dedupe_candidates, matches_pool_constraints};
pub use matcher::{MatchError, MatchResult, MentorMatcher, MAX_MATCHES};
pub use ranking::{parse_ranked_ids, resolve_ranked_ids, strip_code_fences, RankingError, RankingService};
pub use scoring::{calculate_mentor_score, rank_by_score};
