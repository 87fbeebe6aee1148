//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GeneratorError;
use crate::models::config::GenerationConfig;

use super::prompt::{user_prompt, SYSTEM_PROMPT};
use super::CandidateGenerator;

/// Candidate generator backed by a chat-completions endpoint.
pub struct ChatGenerator {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u64,
}

impl ChatGenerator {
    /// Build a client, reading the API key from the configured variable.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GeneratorError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| GeneratorError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    pub fn new(config: &GenerationConfig, api_key: String) -> Result<Self, GeneratorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeneratorError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    fn request_body<'a>(&'a self, user: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CandidateGenerator for ChatGenerator {
    fn generate(&self, text: &str) -> Result<String, GeneratorError> {
        let user = user_prompt(text);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(&user))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Http(format!("request timed out after {}s", self.timeout_secs))
                } else {
                    GeneratorError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| GeneratorError::Response(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GeneratorError::Response("no choices in response".to_string()))?;

        debug!("Generator answered with {} characters", content.len());
        Ok(content)
    }
}
