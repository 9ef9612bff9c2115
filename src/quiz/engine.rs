//! QuizEngine: generates a quiz for a profile and scores answers.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use super::model::{AnswerOutcome, OPTION_COUNT, Quiz, QuizQuestion, QuizSession};
use crate::error::{Error, GenerationError, SchemaViolation};
use crate::llm::{CallKind, CallPayload, GenerativeClient};
use crate::profile::Profile;

/// GENERATE_QUIZ response element as it comes over the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestion {
    question: String,
    options: Vec<String>,
    correct_index: usize,
}

pub struct QuizEngine {
    client: Arc<GenerativeClient>,
    question_count: usize,
}

impl QuizEngine {
    pub fn new(client: Arc<GenerativeClient>, question_count: usize) -> Self {
        Self {
            client,
            question_count,
        }
    }

    /// Generate a fresh quiz for `profile`, positioned at the first question.
    pub async fn start_quiz(&self, profile: &Profile) -> Result<QuizSession, GenerationError> {
        let wire: Vec<WireQuestion> = self
            .client
            .invoke_as(CallPayload::GenerateQuiz {
                context: profile.quiz_context(),
                question_count: self.question_count,
            })
            .await?;

        let quiz = into_quiz(wire)?;
        info!(
            profile_id = %profile.id,
            questions = quiz.len(),
            "Quiz generated"
        );
        Ok(QuizSession::new(quiz))
    }

    /// Score `chosen` against the current question and advance.
    pub fn submit_answer(
        &self,
        session: &mut QuizSession,
        chosen: usize,
    ) -> Result<AnswerOutcome, Error> {
        let outcome = session.submit_answer(chosen)?;
        debug!(
            chosen,
            answered = session.current_index(),
            score = session.score(),
            "Answer recorded"
        );
        Ok(outcome)
    }
}

fn into_quiz(wire: Vec<WireQuestion>) -> Result<Quiz, GenerationError> {
    let kind = CallKind::GenerateQuiz;
    let questions = wire
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let (found, correct) = (q.options.len(), q.correct_index);
            QuizQuestion::new(q.question, q.options, correct).ok_or_else(|| {
                let violation = if found != OPTION_COUNT {
                    SchemaViolation::WrongLength {
                        path: format!("$[{i}].options"),
                        expected: format!("exactly {OPTION_COUNT}"),
                        found,
                    }
                } else {
                    SchemaViolation::OutOfRange {
                        path: format!("$[{i}].correctIndex"),
                        value: correct as f64,
                        min: 0.0,
                        max: (OPTION_COUNT - 1) as f64,
                    }
                };
                GenerationError::new(kind, violation)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Quiz::new(questions).ok_or_else(|| {
        GenerationError::new(
            kind,
            SchemaViolation::WrongLength {
                path: "$".to_string(),
                expected: "at least 1".to_string(),
                found: 0,
            },
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::{GenerationCause, StateError};
    use crate::llm::testing::{ScriptedBackend, client};
    use crate::profile::RiskLevel;
    use crate::profile::model::sample_trajectory;

    fn profile() -> Profile {
        Profile::new(
            "Senior backend engineer.",
            "The Forge of Distributed Systems",
            RiskLevel::Low,
            sample_trajectory(),
        )
    }

    fn question(correct: usize) -> serde_json::Value {
        json!({
            "question": "A storm crosses your sector. Which heading?",
            "options": ["Hold course", "Reroute", "Signal the fleet", "Go dark"],
            "correctIndex": correct,
        })
    }

    #[tokio::test]
    async fn start_quiz_uses_profile_context() {
        let backend = ScriptedBackend::new();
        backend.push_ok(json!([question(0), question(1), question(2)]).to_string());
        let engine = QuizEngine::new(client(&backend), 3);

        let session = engine.start_quiz(&profile()).await.unwrap();
        assert_eq!(session.len(), 3);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests[0].kind, CallKind::GenerateQuiz);
        assert!(
            requests[0]
                .prompt
                .contains("The Forge of Distributed Systems: Senior backend engineer.")
        );
    }

    #[tokio::test]
    async fn full_round_scores_two_of_three() {
        let backend = ScriptedBackend::new();
        backend.push_ok(json!([question(1), question(2), question(3)]).to_string());
        let engine = QuizEngine::new(client(&backend), 3);
        let mut session = engine.start_quiz(&profile()).await.unwrap();

        engine.submit_answer(&mut session, 1).unwrap();
        engine.submit_answer(&mut session, 0).unwrap();
        let last = engine.submit_answer(&mut session, 3).unwrap();

        assert_eq!(
            last,
            AnswerOutcome::Completed { correct: true, final_score: 2, total: 3 }
        );
        assert!(matches!(
            engine.submit_answer(&mut session, 0),
            Err(Error::State(StateError::QuizCompleted))
        ));
    }

    #[tokio::test]
    async fn empty_quiz_is_a_generation_failure() {
        let backend = ScriptedBackend::new();
        backend.push_ok("[]");
        let engine = QuizEngine::new(client(&backend), 3);

        let err = engine.start_quiz(&profile()).await.unwrap_err();
        assert_eq!(err.kind, CallKind::GenerateQuiz);
        assert!(matches!(err.cause, GenerationCause::Schema(_)));
    }

    #[test]
    fn out_of_range_key_is_rejected() {
        let wire = vec![WireQuestion {
            question: "q".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 7,
        }];
        let err = into_quiz(wire).unwrap_err();
        assert!(matches!(
            err.cause,
            GenerationCause::Schema(SchemaViolation::OutOfRange { ref path, .. }) if path == "$[0].correctIndex"
        ));
    }
}
