//! Aptitude quiz: generated questions, answered one at a time.

pub mod engine;
pub mod model;

pub use engine::QuizEngine;
pub use model::{AnswerOutcome, QuestionView, Quiz, QuizQuestion, QuizSession, QuizView};
