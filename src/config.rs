use std::path::PathBuf;

pub const DEFAULT_NUM_QUESTIONS: usize = 3;
pub const DEFAULT_LLM_MODEL: &str = "gpt-4.1-nano";
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_LANGUAGE: &str = "fr";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("number of questions must be at least 1")]
    NoQuestions,
    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    Temperature(f32),
    #[error("at least one transcript language is required")]
    NoLanguages,
}

/// Runtime settings for one run of the app.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Questions to request per video.
    pub num_questions: usize,
    pub llm_model: String,
    pub llm_temperature: f32,
    /// Transcript languages, most preferred first.
    pub languages: Vec<String>,
    /// Chat-completions endpoint root.
    pub api_base: String,
    pub api_key: Option<String>,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_questions: DEFAULT_NUM_QUESTIONS,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_temperature: DEFAULT_LLM_TEMPERATURE,
            languages: vec![DEFAULT_LANGUAGE.to_string()],
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            log_file: std::env::temp_dir().join("video-quiz.log"),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_questions == 0 {
            return Err(ConfigError::NoQuestions);
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ConfigError::Temperature(self.llm_temperature));
        }
        if self.languages.is_empty() {
            return Err(ConfigError::NoLanguages);
        }
        Ok(())
    }
}
