//! Video link to loaded quiz.
//!
//! Both collaborator calls run without touching the session lock. Only the
//! final `load_questions` takes the write lock, so a slow or failed request
//! never disturbs the quiz that is already on screen.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::QuestionSpec;
use crate::session::{SharedQuiz, ValidationError};
use crate::sources::{FetchError, GenerationError, QuestionSource, TranscriptSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingTranscript,
    GeneratingQuestions,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::FetchingTranscript => "Fetching transcript...",
            Stage::GeneratingQuestions => "Generating questions...",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("the generated questions were rejected: {0}")]
    Validation(#[from] ValidationError),
}

/// Progress reports sent back to the UI loop.
#[derive(Debug)]
pub enum PipelineEvent {
    Stage(Stage),
    Loaded { questions: usize },
    Failed(PipelineError),
}

/// Fetch the transcript for `url` and turn it into `count` questions.
pub async fn generate_quiz(
    url: &str,
    transcripts: &dyn TranscriptSource,
    questions: &dyn QuestionSource,
    count: usize,
    progress: &mpsc::UnboundedSender<PipelineEvent>,
) -> Result<Vec<QuestionSpec>, PipelineError> {
    let _ = progress.send(PipelineEvent::Stage(Stage::FetchingTranscript));
    let transcript = transcripts.fetch(url).await?;
    info!("Transcript fetched ({} chars)", transcript.chars().count());

    let _ = progress.send(PipelineEvent::Stage(Stage::GeneratingQuestions));
    let specs = questions.generate(&transcript, count).await?;
    Ok(specs)
}

/// The configured collaborators plus the number of questions to ask for.
#[derive(Clone)]
pub struct Pipeline {
    transcripts: Arc<dyn TranscriptSource>,
    questions: Arc<dyn QuestionSource>,
    count: usize,
}

impl Pipeline {
    pub fn new(
        transcripts: Arc<dyn TranscriptSource>,
        questions: Arc<dyn QuestionSource>,
        count: usize,
    ) -> Self {
        Self {
            transcripts,
            questions,
            count,
        }
    }

    /// Generate questions for `url` and load them into `quiz`.
    ///
    /// Returns the number of questions now in the session.
    pub async fn run(
        &self,
        url: &str,
        quiz: &SharedQuiz,
        progress: &mpsc::UnboundedSender<PipelineEvent>,
    ) -> Result<usize, PipelineError> {
        let specs = generate_quiz(
            url,
            self.transcripts.as_ref(),
            self.questions.as_ref(),
            self.count,
            progress,
        )
        .await?;

        let mut quiz = quiz.write().await;
        quiz.load_questions(specs)?;
        Ok(quiz.len())
    }

    /// Run the pipeline on a background task, reporting through `events`.
    pub fn spawn(
        &self,
        url: String,
        quiz: SharedQuiz,
        events: mpsc::UnboundedSender<PipelineEvent>,
    ) -> JoinHandle<()> {
        let pipeline = self.clone();
        tokio::spawn(async move {
            info!("Generating quiz for {}", url);
            let event = match pipeline.run(&url, &quiz, &events).await {
                Ok(questions) => PipelineEvent::Loaded { questions },
                Err(e) => {
                    warn!("Quiz generation failed: {}", e);
                    PipelineEvent::Failed(e)
                }
            };
            let _ = events.send(event);
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::session;

    struct FixedTranscript(Option<&'static str>);

    #[async_trait]
    impl TranscriptSource for FixedTranscript {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| FetchError::Malformed("no captions".to_string()))
        }
    }

    struct FixedQuestions(Vec<QuestionSpec>);

    #[async_trait]
    impl QuestionSource for FixedQuestions {
        async fn generate(
            &self,
            text: &str,
            count: usize,
        ) -> Result<Vec<QuestionSpec>, GenerationError> {
            assert_eq!(text, "la vie en rose");
            if self.0.is_empty() {
                return Err(GenerationError::EmptyResponse);
            }
            Ok(self.0.iter().take(count).cloned().collect())
        }
    }

    fn spec(prompt: &str) -> QuestionSpec {
        QuestionSpec::new(prompt, ["a", "b", "c", "d"], "a")
    }

    fn pipeline(transcript: Option<&'static str>, specs: Vec<QuestionSpec>) -> Pipeline {
        Pipeline::new(
            Arc::new(FixedTranscript(transcript)),
            Arc::new(FixedQuestions(specs)),
            2,
        )
    }

    async fn seeded_quiz() -> SharedQuiz {
        let quiz = session::shared();
        quiz.write()
            .await
            .load_questions(vec![spec("existing")])
            .unwrap();
        quiz.write().await.select(0, "b").unwrap();
        quiz
    }

    async fn assert_untouched(quiz: &SharedQuiz) {
        let quiz = quiz.read().await;
        assert_eq!(quiz.len(), 1);
        let view = quiz.view_state(0).unwrap();
        assert_eq!(view.prompt, "existing");
        assert_eq!(view.selected, Some("b"));
    }

    #[tokio::test]
    async fn test_run_loads_session_and_reports_stages() {
        let quiz = session::shared();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let loaded = pipeline(Some("la vie en rose"), vec![spec("q1"), spec("q2"), spec("q3")])
            .run("https://youtu.be/abc", &quiz, &tx)
            .await
            .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(quiz.read().await.view_state(1).unwrap().prompt, "q2");
        assert!(matches!(
            rx.recv().await,
            Some(PipelineEvent::Stage(Stage::FetchingTranscript))
        ));
        assert!(matches!(
            rx.recv().await,
            Some(PipelineEvent::Stage(Stage::GeneratingQuestions))
        ));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_session() {
        let quiz = seeded_quiz().await;
        let (tx, _rx) = mpsc::unbounded_channel();

        let err = pipeline(None, vec![spec("q1")])
            .run("https://youtu.be/abc", &quiz, &tx)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Fetch(_)));
        assert_untouched(&quiz).await;
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_session() {
        let quiz = seeded_quiz().await;
        let (tx, _rx) = mpsc::unbounded_channel();

        let err = pipeline(Some("la vie en rose"), Vec::new())
            .run("https://youtu.be/abc", &quiz, &tx)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Generation(_)));
        assert_untouched(&quiz).await;
    }

    #[tokio::test]
    async fn test_invalid_questions_keep_session() {
        let quiz = seeded_quiz().await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let broken = QuestionSpec::new("?", ["a", "b", "c", "d"], "z");

        let err = pipeline(Some("la vie en rose"), vec![spec("ok"), broken])
            .run("https://youtu.be/abc", &quiz, &tx)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::BadSpec { index: 1, .. })
        ));
        assert_untouched(&quiz).await;
    }

    #[tokio::test]
    async fn test_spawn_sends_final_event() {
        let quiz = session::shared();
        let (tx, mut rx) = mpsc::unbounded_channel();

        pipeline(Some("la vie en rose"), vec![spec("q1")])
            .spawn("https://youtu.be/abc".to_string(), quiz.clone(), tx)
            .await
            .unwrap();

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        assert!(matches!(last, Some(PipelineEvent::Loaded { questions: 1 })));
        assert_eq!(quiz.read().await.len(), 1);
    }
}
