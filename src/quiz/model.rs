//! Quiz data model and the scoring state machine.

use serde::Serialize;

use crate::error::{Error, StateError, ValidationError};

/// Options per question.
pub const OPTION_COUNT: usize = 4;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct_option_index: usize,
}

impl QuizQuestion {
    /// Returns `None` unless there are exactly four options and the correct
    /// index points at one of them.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option_index: usize,
    ) -> Option<Self> {
        let options: [String; OPTION_COUNT] = options.try_into().ok()?;
        (correct_option_index < OPTION_COUNT).then(|| Self {
            prompt: prompt.into(),
            options,
            correct_option_index,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }
}

/// An ordered, non-empty sequence of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>) -> Option<Self> {
        (!questions.is_empty()).then_some(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }
}

/// Result of submitting one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// More questions remain.
    Next {
        correct: bool,
        score: usize,
        next_index: usize,
    },
    /// The answer just submitted was the last one.
    Completed {
        correct: bool,
        final_score: usize,
        total: usize,
    },
}

impl AnswerOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// A user's attempt at a quiz.
///
/// `score <= current_index <= quiz.len()` always holds; both only move
/// forward, and together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    quiz: Quiz,
    current_index: usize,
    score: usize,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            current_index: 0,
            score: 0,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn len(&self) -> usize {
        self.quiz.len()
    }

    pub fn is_terminal(&self) -> bool {
        self.current_index == self.quiz.len()
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.quiz.get(self.current_index)
    }

    /// Score one answer and advance. Answers cannot be revised.
    pub fn submit_answer(&mut self, chosen: usize) -> Result<AnswerOutcome, Error> {
        if chosen >= OPTION_COUNT {
            return Err(ValidationError::AnswerOutOfRange {
                index: chosen,
                options: OPTION_COUNT,
            }
            .into());
        }
        let question = self.current_question().ok_or(StateError::QuizCompleted)?;
        let correct = chosen == question.correct_option_index;

        if correct {
            self.score += 1;
        }
        self.current_index += 1;

        if self.is_terminal() {
            Ok(AnswerOutcome::Completed {
                correct,
                final_score: self.score,
                total: self.quiz.len(),
            })
        } else {
            Ok(AnswerOutcome::Next {
                correct,
                score: self.score,
                next_index: self.current_index,
            })
        }
    }

    /// The question currently on screen, without its answer key.
    pub fn view(&self) -> QuizView {
        QuizView {
            current: self.current_question().map(|q| QuestionView {
                index: self.current_index,
                prompt: q.prompt.clone(),
                options: q.options.to_vec(),
            }),
            answered: self.current_index,
            total: self.quiz.len(),
            score: self.score,
            completed: self.is_terminal(),
        }
    }
}

/// Presentation view of a question. Never carries the correct index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

/// Presentation view of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    pub current: Option<QuestionView>,
    pub answered: usize,
    pub total: usize,
    pub score: usize,
    pub completed: bool,
}

#[cfg(test)]
pub(crate) fn sample_quiz(correct: &[usize]) -> Quiz {
    let questions = correct
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let options = ["Chart", "Sail", "Anchor", "Drift"]
                .iter()
                .map(|o| format!("{o} {i}"))
                .collect();
            QuizQuestion::new(format!("Question {i}"), options, c).unwrap()
        })
        .collect();
    Quiz::new(questions).unwrap()
}
