use std::path::PathBuf;

use clap::Parser;
use video_quiz::config::{
    DEFAULT_API_BASE, DEFAULT_LANGUAGE, DEFAULT_LLM_MODEL, DEFAULT_LLM_TEMPERATURE,
    DEFAULT_NUM_QUESTIONS,
};
use video_quiz::{logging, Config};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YouTube link to generate questions for right away
    url: Option<String>,

    /// Number of questions to generate per video
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_QUESTIONS)]
    questions: usize,

    /// Language model used to write the questions
    #[arg(short, long, default_value = DEFAULT_LLM_MODEL)]
    model: String,

    /// Sampling temperature for the language model
    #[arg(short, long, default_value_t = DEFAULT_LLM_TEMPERATURE)]
    temperature: f32,

    /// Transcript language, most preferred first (repeatable)
    #[arg(short, long = "language", default_value = DEFAULT_LANGUAGE)]
    languages: Vec<String>,

    /// Base URL of the chat-completions API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// API key for the language model
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// File to write logs to
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            num_questions: self.questions,
            llm_model: self.model,
            llm_temperature: self.temperature,
            languages: self.languages,
            api_base: self.api_base,
            api_key: self.api_key,
            log_file: self.log_file.unwrap_or(defaults.log_file),
        }
    }
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let mut args = Args::parse();
    let url = args.url.take();
    let config = args.into_config();

    if let Err(e) = logging::init(&config.log_file) {
        eprintln!(
            "Could not open log file {}: {}",
            config.log_file.display(),
            e
        );
    }

    if let Err(e) = video_quiz::run(config, url).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
