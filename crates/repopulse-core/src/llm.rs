//! Summarization seam: a trait over "markdown in, report out" plus the
//! OpenAI-compatible implementation and a dry-run stand-in.
//!
//! Report generation never hands the summarizer anything but markdown text;
//! bundles and stories stay on the caller's side of the seam.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::domain::{PulseError, Result};

/// Produces a prose report from a markdown digest.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, system_prompt: &str, markdown: &str) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Summarizer backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug)]
pub struct OpenAiSummarizer {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiSummarizer {
    /// Build from config. Missing API key is a config error here, not at
    /// load time, so token-less commands keep working.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| PulseError::Config("llm api key is not set".to_string()))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("repopulse/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, system_prompt: &str, markdown: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: markdown,
                },
            ],
            temperature: 0.7,
        };

        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PulseError::Summarizer(format!(
                "chat completion failed with status {}",
                status.as_u16()
            )));
        }

        let body: ChatResponse = response.json().await?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PulseError::Summarizer("chat completion had no choices".to_string()))?;
        Ok(choice.message.content)
    }
}

/// Summarizer that echoes its input instead of calling out. Used by
/// `--dry-run` and tests.
pub struct DryRunSummarizer;

#[async_trait]
impl Summarizer for DryRunSummarizer {
    async fn summarize(&self, _system_prompt: &str, markdown: &str) -> Result<String> {
        Ok(format!("# Dry Run Report\n\n{}", markdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config(api_base: &str) -> LlmConfig {
        LlmConfig {
            api_key: Some("sk-test".to_string()),
            api_base: api_base.to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dry_run_echoes_markdown() {
        let out = DryRunSummarizer
            .summarize("ignored", "## Digest body")
            .await
            .expect("dry run never fails");
        assert_eq!(out, "# Dry Run Report\n\n## Digest body");
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let config = LlmConfig {
            api_key: None,
            ..test_config("https://api.openai.com/v1")
        };
        let err = OpenAiSummarizer::new(&config).expect_err("key is required");
        assert!(matches!(err, PulseError::Config(_)));
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "prompt",
                },
                ChatMessage {
                    role: "user",
                    content: "digest",
                },
            ],
            temperature: 0.7,
        };
        let raw = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(raw["model"], json!("gpt-4o-mini"));
        assert_eq!(raw["messages"][0]["role"], json!("system"));
        assert_eq!(raw["messages"][1]["content"], json!("digest"));
    }

    #[tokio::test]
    async fn test_summarize_reads_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"Two issues closed."}}]}"#)
            .create_async()
            .await;

        let summarizer =
            OpenAiSummarizer::new(&test_config(&server.url())).expect("build summarizer");
        let out = summarizer
            .summarize("prompt", "digest")
            .await
            .expect("summarize");

        assert_eq!(out, "Two issues closed.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_summarize_surfaces_http_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let summarizer =
            OpenAiSummarizer::new(&test_config(&server.url())).expect("build summarizer");
        let err = summarizer
            .summarize("prompt", "digest")
            .await
            .expect_err("500 must fail");
        assert!(matches!(err, PulseError::Summarizer(_)));
    }
}
