use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::core::ranking::{RankingError, RankingService};

const API_VERSION: &str = "2023-06-01";

impl From<reqwest::Error> for RankingError {
    fn from(e: reqwest::Error) -> Self {
        RankingError::Transport(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Language-model client used as the external ranking service
///
/// Sends one single-turn message per call to a messages-style endpoint and
/// returns the first text block. Failures are reported, never retried; the
/// matcher decides what to do with them.
#[derive(Clone)]
pub struct LlmRankingClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmRankingClient {
    /// Create a new ranking client
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, RankingError> {
        if api_key.trim().is_empty() {
            return Err(RankingError::Misconfigured("missing API key".to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
            max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl RankingService for LlmRankingClient {
    async fn rank(&self, system: &str, prompt: &str) -> Result<String, RankingError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(RankingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await?;

        parsed
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(RankingError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::Server) -> LlmRankingClient {
        LlmRankingClient::new(
            format!("{}/v1/messages", server.url()),
            "test-key".to_string(),
            "test-model".to_string(),
            256,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let result = LlmRankingClient::new(
            "http://localhost/v1/messages".to_string(),
            "   ".to_string(),
            "test-model".to_string(),
            256,
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(RankingError::Misconfigured(_))));
    }

    #[tokio::test]
    async fn test_rank_returns_first_text_block() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "test-model",
                "system": "sys"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content":[{"type":"text","text":"[\"m2\",\"m1\"]"}],"usage":{"input_tokens":1,"output_tokens":1}}"#)
            .create_async()
            .await;

        let text = client_for(&server).rank("sys", "prompt").await.unwrap();

        assert_eq!(text, r#"["m2","m1"]"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rank_surfaces_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).rank("sys", "prompt").await.unwrap_err();

        match err {
            RankingError::Api { status, message } => {
                assert_eq!(status, 529);
                assert_eq!(message, "Overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rank_rejects_empty_content() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;

        let err = client_for(&server).rank("sys", "prompt").await.unwrap_err();
        assert!(matches!(err, RankingError::EmptyResponse));
    }
}
