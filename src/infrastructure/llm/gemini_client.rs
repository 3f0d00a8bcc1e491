use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini `generateContent` API. One request per prompt, no
/// retries; every failure is terminal for the calling request.
pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
    max_output_tokens: u32,
    client: Client,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<Self, LlmClientError> {
        Self::with_endpoint(
            api_key,
            model,
            temperature,
            max_output_tokens,
            DEFAULT_ENDPOINT.to_string(),
        )
    }

    pub fn with_endpoint(
        api_key: String,
        model: String,
        temperature: f32,
        max_output_tokens: u32,
        endpoint: String,
    ) -> Result<Self, LlmClientError> {
        if api_key.is_empty() {
            return Err(LlmClientError::ApiRequestFailed(
                "API key cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        Ok(Self {
            api_key,
            model,
            endpoint,
            temperature,
            max_output_tokens,
            client,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    #[tracing::instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String, LlmClientError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Generative API rate limited");
            return Err(LlmClientError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Generative API request failed");
            return Err(LlmClientError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                LlmClientError::InvalidResponse("reply carried no candidates".to_string())
            })?;

        tracing::debug!(chars = text.len(), "Generative API reply received");
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client_for(server: &Server) -> GeminiClient {
        GeminiClient::with_endpoint(
            "test-api-key".to_string(),
            "gemini-pro".to_string(),
            0.7,
            2048,
            server.url(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn rejects_empty_api_key() {
        let result = GeminiClient::new(String::new(), "gemini-pro".to_string(), 0.7, 2048);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn returns_candidate_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(mockito::Matcher::UrlEncoded(
                "key".into(),
                "test-api-key".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                "candidates": [{
                    "content": {
                        "parts": [{"text": "{\"questions\": []}"}]
                    }
                }]
            }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let reply = client.generate("write me questions").await.unwrap();

        assert_eq!(reply, "{\"questions\": []}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn maps_429_to_rate_limited() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, LlmClientError::RateLimited));
    }

    #[tokio::test]
    async fn surfaces_upstream_error_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate("prompt").await.unwrap_err();

        match err {
            LlmClientError::ApiRequestFailed(msg) => assert!(msg.contains("upstream exploded")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_candidates_is_invalid_response() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.generate("prompt").await.unwrap_err();

        assert!(matches!(err, LlmClientError::InvalidResponse(_)));
    }
}
