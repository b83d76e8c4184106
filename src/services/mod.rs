// Service exports
pub mod directory;
pub mod llm;

pub use directory::{DirectoryClient, DirectoryError, UserDirectory};
pub use llm::LlmRankingClient;
