use crate::models::SpecDefect;

/// A question set was rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("the question set is empty")]
    EmptyQuestionSet,
    #[error("question {} is invalid: {reason}", .index + 1)]
    BadSpec { index: usize, reason: SpecDefect },
}

/// A user action that is not legal in the question's current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("question {index} does not exist (quiz has {len} questions)")]
    OutOfRange { index: usize, len: usize },
    #[error("{option:?} is not an option of question {}", .index + 1)]
    UnknownOption { index: usize, option: String },
    #[error("question {} has already been submitted", .index + 1)]
    AlreadySubmitted { index: usize },
    #[error("select an answer to question {} before submitting", .index + 1)]
    NoSelection { index: usize },
}
