//! The quiz session controller.
//!
//! Owns the one active question set together with each question's answer
//! state, and applies user actions to it. Every operation either succeeds
//! completely or leaves the session untouched.

use log::{debug, info};
use uuid::Uuid;

use crate::models::{QuestionPhase, QuestionSpec, QuestionView, Verdict};

use super::error::{ActionError, ValidationError};

/// Answer progress for one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct QuestionState {
    selected: Option<String>,
    submitted: bool,
}

impl QuestionState {
    fn phase(&self) -> QuestionPhase {
        match (self.submitted, &self.selected) {
            (true, _) => QuestionPhase::Graded,
            (false, Some(_)) => QuestionPhase::Answered,
            (false, None) => QuestionPhase::Unanswered,
        }
    }
}

/// One question of the active session.
#[derive(Debug, Clone)]
struct Entry {
    spec: QuestionSpec,
    state: QuestionState,
}

/// Running tally of graded answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: usize,
    pub graded: usize,
    pub total: usize,
}

#[derive(Debug, Default)]
pub struct QuizController {
    session_id: Option<Uuid>,
    entries: Vec<Entry>,
}

impl QuizController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session with a fresh one built from `specs`.
    ///
    /// The whole set is validated before anything is touched, so a
    /// rejected set leaves the previous session in place.
    pub fn load_questions(&mut self, specs: Vec<QuestionSpec>) -> Result<(), ValidationError> {
        if specs.is_empty() {
            return Err(ValidationError::EmptyQuestionSet);
        }

        for (index, spec) in specs.iter().enumerate() {
            spec.check()
                .map_err(|reason| ValidationError::BadSpec { index, reason })?;
        }

        let session_id = Uuid::new_v4();
        self.entries = specs
            .into_iter()
            .map(|spec| Entry {
                spec,
                state: QuestionState::default(),
            })
            .collect();
        self.session_id = Some(session_id);

        info!(
            "Loaded session {} with {} questions",
            session_id,
            self.entries.len()
        );
        Ok(())
    }

    /// Choose `option` as the answer to question `index`.
    pub fn select(&mut self, index: usize, option: &str) -> Result<(), ActionError> {
        let entry = self.entry_mut(index)?;

        if entry.state.submitted {
            return Err(ActionError::AlreadySubmitted { index });
        }
        if !entry.spec.has_option(option) {
            return Err(ActionError::UnknownOption {
                index,
                option: option.to_string(),
            });
        }

        if entry.state.selected.as_deref() != Some(option) {
            entry.state.selected = Some(option.to_string());
        }
        Ok(())
    }

    /// Grade question `index` and lock it.
    pub fn submit(&mut self, index: usize) -> Result<Verdict, ActionError> {
        let entry = self.entry_mut(index)?;

        if entry.state.submitted {
            return Err(ActionError::AlreadySubmitted { index });
        }
        let Some(selected) = entry.state.selected.as_deref() else {
            return Err(ActionError::NoSelection { index });
        };

        let verdict = Verdict::grade(&entry.spec, selected);
        entry.state.submitted = true;

        debug!(
            "Question {} submitted: {:?} ({})",
            index,
            selected,
            if verdict.is_correct { "correct" } else { "incorrect" }
        );
        Ok(verdict)
    }

    /// Clear every answer in the session, keeping the questions.
    pub fn reset_all(&mut self) {
        for entry in &mut self.entries {
            entry.state = QuestionState::default();
        }
        if let Some(id) = self.session_id {
            info!("Reset all answers in session {}", id);
        }
    }

    pub fn view_state(&self, index: usize) -> Result<QuestionView<'_>, ActionError> {
        let entry = self.entry(index)?;
        let selected = entry.state.selected.as_deref();

        Ok(QuestionView {
            prompt: &entry.spec.prompt,
            options: &entry.spec.options,
            selected,
            locked: entry.state.submitted,
            verdict: match (entry.state.submitted, selected) {
                (true, Some(answer)) => Some(Verdict::grade(&entry.spec, answer)),
                _ => None,
            },
        })
    }

    /// Views for every question, in order.
    pub fn views(&self) -> impl Iterator<Item = QuestionView<'_>> {
        (0..self.entries.len()).filter_map(|index| self.view_state(index).ok())
    }

    pub fn phase(&self, index: usize) -> Result<QuestionPhase, ActionError> {
        self.entry(index).map(|entry| entry.state.phase())
    }

    pub fn score(&self) -> Score {
        self.entries.iter().fold(
            Score {
                total: self.entries.len(),
                ..Score::default()
            },
            |mut score, entry| {
                if let (true, Some(answer)) = (entry.state.submitted, &entry.state.selected) {
                    score.graded += 1;
                    if *answer == entry.spec.correct_option {
                        score.correct += 1;
                    }
                }
                score
            },
        )
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, index: usize) -> Result<&Entry, ActionError> {
        let len = self.entries.len();
        self.entries
            .get(index)
            .ok_or(ActionError::OutOfRange { index, len })
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut Entry, ActionError> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(ActionError::OutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpecDefect;

    fn arithmetic() -> QuestionSpec {
        QuestionSpec::new("2+2?", ["3", "4", "5", "6"], "4")
    }

    fn geography() -> QuestionSpec {
        QuestionSpec::new(
            "Capital of France?",
            ["Paris", "Lyon", "Marseille", "Nice"],
            "Paris",
        )
    }

    fn loaded(specs: Vec<QuestionSpec>) -> QuizController {
        let mut quiz = QuizController::new();
        quiz.load_questions(specs).unwrap();
        quiz
    }

    #[test]
    fn test_load_starts_unanswered() {
        let quiz = loaded(vec![arithmetic(), geography()]);

        assert_eq!(quiz.len(), 2);
        assert!(quiz.session_id().is_some());
        for view in quiz.views() {
            assert_eq!(view.selected, None);
            assert!(!view.locked);
            assert_eq!(view.verdict, None);
            assert_eq!(view.phase(), QuestionPhase::Unanswered);
        }
    }

    #[test]
    fn test_load_empty_keeps_previous_session() {
        let mut quiz = loaded(vec![arithmetic()]);
        quiz.select(0, "5").unwrap();
        let id = quiz.session_id();

        assert_eq!(
            quiz.load_questions(Vec::new()),
            Err(ValidationError::EmptyQuestionSet)
        );
        assert_eq!(quiz.session_id(), id);
        let view = quiz.view_state(0).unwrap();
        assert_eq!(view.prompt, "2+2?");
        assert_eq!(view.selected, Some("5"));
    }

    #[test]
    fn test_load_bad_spec_is_not_partially_applied() {
        let mut quiz = loaded(vec![geography()]);
        let bad = QuestionSpec::new("1+1?", ["1", "3", "4", "5"], "2");

        let err = quiz.load_questions(vec![arithmetic(), bad]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BadSpec {
                index: 1,
                reason: SpecDefect::MissingCorrectOption("2".to_string()),
            }
        );
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz.view_state(0).unwrap().prompt, "Capital of France?");
    }

    #[test]
    fn test_reload_replaces_session() {
        let mut quiz = loaded(vec![arithmetic()]);
        quiz.select(0, "4").unwrap();
        quiz.submit(0).unwrap();
        let first_id = quiz.session_id();

        quiz.load_questions(vec![arithmetic(), geography()]).unwrap();
        assert_ne!(quiz.session_id(), first_id);
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.phase(0), Ok(QuestionPhase::Unanswered));
    }

    #[test]
    fn test_select_round_trips_through_view() {
        let mut quiz = loaded(vec![geography()]);
        for option in ["Paris", "Lyon", "Marseille", "Nice"] {
            quiz.select(0, option).unwrap();
            assert_eq!(quiz.view_state(0).unwrap().selected, Some(option));
        }
    }

    #[test]
    fn test_select_same_option_twice_is_noop() {
        let mut quiz = loaded(vec![arithmetic()]);
        quiz.select(0, "3").unwrap();
        quiz.select(0, "3").unwrap();
        assert_eq!(quiz.view_state(0).unwrap().selected, Some("3"));
        assert_eq!(quiz.phase(0), Ok(QuestionPhase::Answered));
    }

    #[test]
    fn test_select_rejects_bad_input() {
        let mut quiz = loaded(vec![arithmetic()]);

        assert_eq!(
            quiz.select(3, "4"),
            Err(ActionError::OutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            quiz.select(0, "42"),
            Err(ActionError::UnknownOption {
                index: 0,
                option: "42".to_string()
            })
        );
        assert_eq!(quiz.view_state(0).unwrap().selected, None);
    }

    #[test]
    fn test_select_after_submit_is_rejected() {
        let mut quiz = loaded(vec![arithmetic()]);
        quiz.select(0, "3").unwrap();
        quiz.submit(0).unwrap();

        assert_eq!(
            quiz.select(0, "4"),
            Err(ActionError::AlreadySubmitted { index: 0 })
        );
        // Graded wins over an unknown option.
        assert_eq!(
            quiz.select(0, "nope"),
            Err(ActionError::AlreadySubmitted { index: 0 })
        );
        assert_eq!(quiz.view_state(0).unwrap().selected, Some("3"));
    }

    #[test]
    fn test_submit_without_selection() {
        let mut quiz = loaded(vec![arithmetic()]);
        assert_eq!(quiz.submit(0), Err(ActionError::NoSelection { index: 0 }));
        assert_eq!(quiz.phase(0), Ok(QuestionPhase::Unanswered));
    }

    #[test]
    fn test_correct_answer_end_to_end() {
        let mut quiz = loaded(vec![arithmetic()]);
        quiz.select(0, "4").unwrap();

        let verdict = quiz.submit(0).unwrap();
        assert_eq!(
            verdict,
            Verdict {
                is_correct: true,
                correct_option: "4".to_string()
            }
        );
        assert_eq!(
            quiz.submit(0),
            Err(ActionError::AlreadySubmitted { index: 0 })
        );
        assert_eq!(quiz.view_state(0).unwrap().verdict, Some(verdict));
    }

    #[test]
    fn test_incorrect_answer_end_to_end() {
        let mut quiz = loaded(vec![arithmetic()]);
        quiz.select(0, "3").unwrap();

        let verdict = quiz.submit(0).unwrap();
        assert!(!verdict.is_correct);
        assert_eq!(verdict.correct_option, "4");

        let view = quiz.view_state(0).unwrap();
        assert!(view.locked);
        assert_eq!(view.phase(), QuestionPhase::Graded);
        assert_eq!(view.verdict, Some(verdict));
    }

    #[test]
    fn test_reset_all_clears_mixed_states() {
        let mut quiz = loaded(vec![arithmetic(), geography(), arithmetic()]);
        quiz.select(0, "4").unwrap();
        quiz.submit(0).unwrap();
        quiz.select(1, "Lyon").unwrap();

        quiz.reset_all();

        for view in quiz.views() {
            assert_eq!(view.selected, None);
            assert!(!view.locked);
            assert_eq!(view.verdict, None);
        }
        assert_eq!(quiz.len(), 3);
        // Graded questions become answerable again.
        quiz.select(0, "3").unwrap();
    }

    #[test]
    fn test_reset_all_on_empty_session() {
        let mut quiz = QuizController::new();
        quiz.reset_all();
        assert!(quiz.is_empty());
        assert_eq!(
            quiz.view_state(0),
            Err(ActionError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_score_counts_only_graded() {
        let mut quiz = loaded(vec![arithmetic(), geography(), arithmetic()]);
        quiz.select(0, "4").unwrap();
        quiz.submit(0).unwrap();
        quiz.select(1, "Nice").unwrap();
        quiz.submit(1).unwrap();
        quiz.select(2, "4").unwrap();

        assert_eq!(
            quiz.score(),
            Score {
                correct: 1,
                graded: 2,
                total: 3
            }
        );
    }
}
