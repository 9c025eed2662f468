//! Quiz session state.
//!
//! [`QuizController`] is the single owner of the active question set.
//! [`SharedQuiz`] is the handle the UI loop and the generation task share.

mod controller;
mod error;

use std::sync::Arc;

use tokio::sync::RwLock;

pub use controller::{QuizController, Score};
pub use error::{ActionError, ValidationError};

/// Controller behind one lock: mutators take the write half, views the read half.
pub type SharedQuiz = Arc<RwLock<QuizController>>;

pub fn shared() -> SharedQuiz {
    Arc::new(RwLock::new(QuizController::new()))
}
