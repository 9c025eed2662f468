use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Number of options every question must carry.
pub const NUM_OPTIONS: usize = 4;

/// A multiple-choice question as produced by a question source.
///
/// The serialized field names follow the format the language model is
/// prompted with (`question`, `options`, `answer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    #[serde(rename = "question", alias = "prompt")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "answer", alias = "correct_option")]
    pub correct_option: String,
}

/// Why a [`QuestionSpec`] was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecDefect {
    #[error("expected 4 options, found {0}")]
    WrongOptionCount(usize),
    #[error("option {0:?} appears more than once")]
    DuplicateOption(String),
    #[error("correct option {0:?} is not one of the options")]
    MissingCorrectOption(String),
}

impl QuestionSpec {
    pub fn new<P, O, S, C>(prompt: P, options: O, correct_option: C) -> Self
    where
        P: Into<String>,
        O: IntoIterator<Item = S>,
        S: Into<String>,
        C: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_option: correct_option.into(),
        }
    }

    /// Check the four-distinct-options invariant and that the correct
    /// option is one of them.
    pub fn check(&self) -> Result<(), SpecDefect> {
        if self.options.len() != NUM_OPTIONS {
            return Err(SpecDefect::WrongOptionCount(self.options.len()));
        }

        let mut seen = HashSet::with_capacity(NUM_OPTIONS);
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(SpecDefect::DuplicateOption(option.clone()));
            }
        }

        if !self.has_option(&self.correct_option) {
            return Err(SpecDefect::MissingCorrectOption(self.correct_option.clone()));
        }

        Ok(())
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }
}

/// The result of grading one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_correct: bool,
    pub correct_option: String,
}

impl Verdict {
    pub fn grade(spec: &QuestionSpec, selected: &str) -> Self {
        Self {
            is_correct: selected == spec.correct_option,
            correct_option: spec.correct_option.clone(),
        }
    }
}

/// Where a single question is in its answer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPhase {
    /// Nothing selected yet.
    Unanswered,
    /// An option is selected but not submitted.
    Answered,
    /// Submitted and locked until the next reset or reload.
    Graded,
}

/// Everything the UI needs to draw one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView<'a> {
    pub prompt: &'a str,
    pub options: &'a [String],
    pub selected: Option<&'a str>,
    pub locked: bool,
    pub verdict: Option<Verdict>,
}

impl QuestionView<'_> {
    pub fn phase(&self) -> QuestionPhase {
        match (self.locked, self.selected) {
            (true, _) => QuestionPhase::Graded,
            (false, Some(_)) => QuestionPhase::Answered,
            (false, None) => QuestionPhase::Unanswered,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected?;
        self.options.iter().position(|o| o == selected)
    }
}
