use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use crate::core::filters::matches_pool_constraints;
use crate::models::{CandidateQuery, DirectoryUser, MentorCandidate};

/// Errors that can occur when querying the user directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Member directory consumed by the mentor-match endpoint
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch one member by id
    async fn get_user(&self, user_id: &str) -> Result<DirectoryUser, DirectoryError>;

    /// Fetch the mentor-eligible, verified members of an institution
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<MentorCandidate>, DirectoryError>;
}

/// Document-store REST client for the users collection
pub struct DirectoryClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    users_collection: String,
    client: Client,
}

impl DirectoryClient {
    /// Create a new directory client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        users_collection: String,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            users_collection,
            client,
        })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.users_collection
        )
    }

    async fn fetch_documents(&self, url: &str) -> Result<Vec<Value>, DirectoryError> {
        let response = self
            .client
            .get(url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DirectoryError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Directory request failed: {} - {}", status, body);
            return Err(DirectoryError::ApiError(format!("Directory returned {}", status)));
        }

        let mut json: Value = response.json().await?;

        match json.get_mut("documents").map(Value::take) {
            Some(Value::Array(documents)) => Ok(documents),
            _ => Err(DirectoryError::InvalidResponse("Missing documents array".into())),
        }
    }
}

/// Build the document-store query list for an institution's mentor pool
pub fn candidate_queries(query: &CandidateQuery) -> Vec<String> {
    let mut queries = vec![
        r#"equal("role", "Alumni")"#.to_string(),
        r#"equal("is_mentor", true)"#.to_string(),
        r#"equal("status", "Verified")"#.to_string(),
        format!("equal(\"institution_id\", {})", json_string(&query.institution_id)),
    ];

    if let Some(exclude) = &query.exclude_user_id {
        queries.push(format!("notEqual(\"$id\", {})", json_string(exclude)));
    }

    queries.push(format!("limit({})", query.limit));
    queries
}

fn json_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

#[async_trait]
impl UserDirectory for DirectoryClient {
    async fn get_user(&self, user_id: &str) -> Result<DirectoryUser, DirectoryError> {
        let url = format!("{}/{}", self.documents_url(), urlencoding::encode(user_id));

        tracing::debug!("Fetching directory user: {}", user_id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::NOT_FOUND => {
                return Err(DirectoryError::NotFound(format!("User {} not found", user_id)));
            }
            reqwest::StatusCode::UNAUTHORIZED => return Err(DirectoryError::Unauthorized),
            status if !status.is_success() => {
                return Err(DirectoryError::ApiError(format!(
                    "Failed to fetch user: {}",
                    status
                )));
            }
            _ => {}
        }

        let doc: Value = response.json().await?;
        let data = doc.get("data").cloned().unwrap_or(doc);

        serde_json::from_value(data)
            .map_err(|e| DirectoryError::InvalidResponse(format!("Failed to parse user: {}", e)))
    }

    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<MentorCandidate>, DirectoryError> {
        let queries = candidate_queries(query);
        let queries_json = serde_json::to_string(&queries)
            .map_err(|e| DirectoryError::InvalidResponse(e.to_string()))?;
        let url = format!("{}?query={}", self.documents_url(), urlencoding::encode(&queries_json));

        tracing::debug!("Querying mentor pool for institution {}", query.institution_id);

        let documents = self.fetch_documents(&url).await?;
        let total = documents.len();

        let candidates: Vec<MentorCandidate> = documents
            .into_iter()
            .filter_map(|doc| {
                let data = doc.get("data").cloned().unwrap_or(doc);
                match serde_json::from_value::<DirectoryUser>(data) {
                    Ok(user) => Some(user),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable directory document: {}", e);
                        None
                    }
                }
            })
            .filter(|user| {
                matches_pool_constraints(user, &query.institution_id, query.exclude_user_id.as_deref())
            })
            .map(|user| MentorCandidate::from(&user))
            .collect();

        tracing::debug!("Mentor pool: {} candidates ({} documents)", candidates.len(), total);

        Ok(candidates)
    }
}
