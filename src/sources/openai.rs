//! Question generation through the OpenAI chat-completions API.

use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::QuestionSpec;

use super::prompt::render_prompt;
use super::{GenerationError, QuestionSource};

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// What a model is allowed to answer with.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionPayload {
    List(Vec<QuestionSpec>),
    Wrapped { questions: Vec<QuestionSpec> },
}

#[derive(Clone)]
pub struct OpenAiQuestionGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiQuestionGenerator {
    pub fn new(api_key: String, model: String, temperature: f32) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: crate::config::DEFAULT_API_BASE.to_string(),
            model,
            temperature,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GenerationError::MissingApiKey)?;

        Ok(Self::new(api_key, config.llm_model.clone(), config.llm_temperature)
            .with_base_url(config.api_base.clone()))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn complete(&self, prompt: String) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: self.temperature,
        };

        info!("Sending request to {} with model: {}", self.base_url, self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("LLM API error {}: {}", status, body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response: ChatResponse = response.json().await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl QuestionSource for OpenAiQuestionGenerator {
    async fn generate(
        &self,
        text: &str,
        count: usize,
    ) -> Result<Vec<QuestionSpec>, GenerationError> {
        let content = self.complete(render_prompt(text, count)).await?;
        let questions = parse_questions(&content)?;
        info!("Model returned {} questions", questions.len());
        Ok(questions)
    }
}

/// Parse a model reply into question records.
///
/// Accepts a bare JSON list, the same list inside a Markdown code fence, or
/// an object with a `questions` list. Records are not validated here.
pub fn parse_questions(content: &str) -> Result<Vec<QuestionSpec>, GenerationError> {
    let payload: QuestionPayload = serde_json::from_str(strip_code_fence(content))?;
    Ok(match payload {
        QuestionPayload::List(questions) | QuestionPayload::Wrapped { questions } => questions,
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line.
    let inner = inner.split_once('\n').map_or("", |(_, body)| body);
    inner.trim_end().trim_end_matches("```").trim()
}
