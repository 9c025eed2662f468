mod question;

pub use question::{
    QuestionPhase, QuestionSpec, QuestionView, SpecDefect, Verdict, NUM_OPTIONS,
};
