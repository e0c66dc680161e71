//! OpenAI API provider.
//!
//! Implements the `AnswerProvider` trait for OpenAI's Chat Completions
//! API. One POST per ask; the response is awaited as a single unit.

use super::provider::AnswerProvider;
use super::types::{Answer, Message, QueryError, Role};
use crate::config::Config;
use crate::credential::Credential;
use crate::prompt::PromptContext;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Temperature biasing the model toward deterministic answers.
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// OpenAI provider configuration and state.
pub struct OpenAiClient {
    client: Client,
    api_url: String,
    credential: Credential,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(credential: Credential, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: OPENAI_API_URL.to_string(),
            credential,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Client configured from the persisted config.
    pub fn from_config(credential: Credential, config: &Config) -> Self {
        Self::new(credential, config.model.name()).with_temperature(config.temperature)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Point the client at a different endpoint. Used by tests to target
    /// a local stub server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[async_trait]
impl AnswerProvider for OpenAiClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn ask(&self, prompt: &PromptContext) -> Result<Answer, QueryError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::from(&Message::user(prompt.body()))],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header(
                "Authorization",
                format!("Bearer {}", self.credential.expose()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| QueryError::NetworkFailure(e.to_string()))?;

        match response.status().as_u16() {
            200..=299 => {}
            401 => return Err(QueryError::Unauthorized),
            429 => return Err(QueryError::RateLimited),
            code => return Err(QueryError::ServiceError(code)),
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|_| QueryError::MalformedResponse)?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or(QueryError::MalformedResponse)?;

        Ok(Answer {
            text: choice.message.content,
        })
    }
}

// -----------------------------------------------------------------------------
// OpenAI DTOs (Data Transfer Objects)
// -----------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

impl From<&Message> for ApiMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: match msg.role {
                Role::System => "system".to_string(),
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: msg.content.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    content: String,
}
