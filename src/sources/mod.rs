//! External collaborators: where transcripts and questions come from.

mod openai;
mod prompt;
mod video;
mod youtube;

use async_trait::async_trait;

use crate::models::QuestionSpec;

pub use openai::{parse_questions, OpenAiQuestionGenerator};
pub use prompt::{render_prompt, PROMPT_TEMPLATE};
pub use video::{UrlError, VideoId};
pub use youtube::YouTubeTranscripts;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Url(#[from] UrlError),
    #[error("transcript request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("transcripts are disabled for video {0}")]
    TranscriptsDisabled(VideoId),
    #[error("no transcript in {wanted:?} for video {video} (available: {available:?})")]
    NoTranscript {
        video: VideoId,
        wanted: Vec<String>,
        available: Vec<String>,
    },
    #[error("malformed caption data: {0}")]
    Malformed(String),
    #[error("transcript for video {0} is empty")]
    Empty(VideoId),
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,
    #[error("LLM call failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LLM API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("LLM returned no content")]
    EmptyResponse,
    #[error("could not parse LLM response as JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Turns a video link into the plain text of its spoken transcript.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Produces multiple-choice questions about a text.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(&self, text: &str, count: usize)
        -> Result<Vec<QuestionSpec>, GenerationError>;
}
