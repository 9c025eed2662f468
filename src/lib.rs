//! # video-quiz
//!
//! Turn a YouTube video into a multiple-choice comprehension quiz in the
//! terminal. The transcript is fetched from the video's captions, a
//! language model writes the questions, and each question can be answered,
//! submitted and graded on its own.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use video_quiz::{Config, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config {
//!         api_key: std::env::var("OPENAI_API_KEY").ok(),
//!         ..Config::default()
//!     };
//!
//!     // Take over the terminal until the user quits.
//!     video_quiz::run(config, Some("https://youtu.be/dQw4w9WgXcQ".to_string())).await
//! }
//! ```
//!
//! The quiz state machine is usable without any UI:
//!
//! ```rust
//! use video_quiz::{QuestionSpec, QuizController};
//!
//! let mut quiz = QuizController::new();
//! quiz.load_questions(vec![QuestionSpec::new("2+2?", ["3", "4", "5", "6"], "4")])
//!     .unwrap();
//! quiz.select(0, "4").unwrap();
//! assert!(quiz.submit(0).unwrap().is_correct);
//! ```

mod app;
pub mod config;
pub mod logging;
mod models;
pub mod pipeline;
pub mod session;
pub mod sources;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use app::{Action, App, Notice, Screen};
pub use config::{Config, ConfigError};
pub use models::{QuestionPhase, QuestionSpec, QuestionView, SpecDefect, Verdict, NUM_OPTIONS};
pub use pipeline::{Pipeline, PipelineError, PipelineEvent, Stage};
pub use session::{ActionError, QuizController, Score, SharedQuiz, ValidationError};
pub use sources::{
    FetchError, GenerationError, OpenAiQuestionGenerator, QuestionSource, TranscriptSource,
    YouTubeTranscripts,
};

const TICK_RATE: Duration = Duration::from_millis(120);

/// Error type for running the app.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generator(#[from] GenerationError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Run the quiz in the terminal.
///
/// When `initial_url` is given, question generation for it starts right
/// away. Returns when the user quits.
pub async fn run(config: Config, initial_url: Option<String>) -> Result<(), QuizError> {
    config.validate()?;

    let pipeline = Pipeline::new(
        Arc::new(YouTubeTranscripts::new(config.languages.clone())),
        Arc::new(OpenAiQuestionGenerator::from_config(&config)?),
        config.num_questions,
    );
    info!(
        "Starting with model {} ({} questions, languages {:?})",
        config.llm_model, config.num_questions, config.languages
    );

    let mut term = terminal::init()?;
    let result = run_event_loop(&mut term, &pipeline, initial_url).await;
    terminal::restore()?;
    result
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    pipeline: &Pipeline,
    initial_url: Option<String>,
) -> Result<(), QuizError> {
    let quiz = session::shared();
    let mut app = App::new();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<PipelineEvent>();
    let mut input = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);
    let mut generation: Option<JoinHandle<()>> = None;

    if let Some(url) = initial_url {
        if let Action::Generate(url) = app.submit_url(&url) {
            generation = Some(pipeline.spawn(url, Arc::clone(&quiz), events_tx.clone()));
        }
    }

    loop {
        {
            let quiz = quiz.read().await;
            terminal.draw(|frame| ui::render(frame, &app, &quiz))?;
        }

        tokio::select! {
            maybe_event = input.next() => {
                let Some(event) = maybe_event else {
                    break;
                };
                match event? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        let action = {
                            let mut quiz = quiz.write().await;
                            app.handle_key(key, &mut quiz)
                        };
                        match action {
                            Action::Quit => break,
                            Action::Generate(url) => {
                                if let Some(stale) = generation.take() {
                                    stale.abort();
                                }
                                generation =
                                    Some(pipeline.spawn(url, Arc::clone(&quiz), events_tx.clone()));
                            }
                            Action::None => {}
                        }
                    }
                    Event::Paste(text) => app.handle_paste(&text),
                    _ => {}
                }
            }
            Some(event) = events_rx.recv() => app.handle_pipeline_event(event),
            _ = ticker.tick() => app.tick(),
        }
    }

    if let Some(handle) = generation {
        handle.abort();
    }
    Ok(())
}
