//! SessionController: owns the single session aggregate and runs every
//! user intent through the stage machine.
//!
//! Backend calls run with the lock released. Each call is tagged with the
//! session generation at issue time; a result that comes back after a reset
//! is dropped rather than applied.

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use super::log::{LogEntry, LogSource, NavigationLog};
use super::model::{RoadmapView, SessionEvent, SessionSnapshot};
use super::state::Stage;
use crate::error::{Error, GenerationError, Result, StateError, ValidationError};
use crate::llm::{CallKind, GenerativeClient};
use crate::profile::model::DEFAULT_VIEWBOX;
use crate::profile::{Dossier, Profile, ProfileAnalyzer};
use crate::quiz::model::OPTION_COUNT;
use crate::quiz::{AnswerOutcome, QuizEngine, QuizSession};
use crate::roadmap::{RoadmapCursor, RoadmapPlanner};

const EVENT_CAPACITY: usize = 256;

/// The Profile / QuizSession / Roadmap triple plus bookkeeping.
#[derive(Debug, Default)]
struct Session {
    stage: Stage,
    profile: Option<Profile>,
    quiz: Option<QuizSession>,
    roadmap: Option<RoadmapCursor>,
    log: NavigationLog,
    generation: u64,
    in_flight: Option<CallKind>,
}

impl Session {
    /// Reserve the single backend slot. Returns the generation to check
    /// the result against.
    fn begin(&mut self, kind: CallKind) -> std::result::Result<u64, StateError> {
        if let Some(pending) = self.in_flight {
            return Err(StateError::CallInFlight { kind: pending });
        }
        self.in_flight = Some(kind);
        Ok(self.generation)
    }

    fn ensure_current(&self, kind: CallKind, issued: u64) -> std::result::Result<(), StateError> {
        if self.generation != issued {
            return Err(StateError::Superseded {
                kind,
                issued,
                current: self.generation,
            });
        }
        Ok(())
    }

    fn transition(&mut self, to: Stage) -> std::result::Result<(), StateError> {
        if !self.stage.can_transition_to(to) {
            return Err(StateError::InvalidTransition {
                from: self.stage,
                to,
            });
        }
        self.stage = to;
        Ok(())
    }

    fn observed_stage(&self) -> Stage {
        match (self.stage, self.in_flight) {
            (Stage::Intake, Some(_)) => Stage::Analysis,
            (stage, _) => stage,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation,
            stage: self.observed_stage(),
            pending: self.in_flight,
            profile: self.profile.clone(),
            chart: self
                .profile
                .as_ref()
                .map(|p| p.trajectory.chart(DEFAULT_VIEWBOX)),
            quiz: self.quiz.as_ref().map(QuizSession::view),
            roadmap: self
                .roadmap
                .as_ref()
                .map(|cursor| RoadmapView::new(cursor, self.profile.as_ref())),
            log_len: self.log.len(),
        }
    }
}

/// What an answer produced, plus the roadmap failure if completing the
/// quiz triggered one.
#[derive(Debug)]
pub struct AnswerReport {
    pub outcome: AnswerOutcome,
    pub snapshot: SessionSnapshot,
    pub roadmap_error: Option<Error>,
}

pub struct SessionController {
    session: RwLock<Session>,
    analyzer: ProfileAnalyzer,
    quiz_engine: QuizEngine,
    planner: RoadmapPlanner,
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(client: Arc<GenerativeClient>, quiz_length: usize) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        let mut session = Session::default();
        session.log.append(
            LogSource::System,
            "Astrograph initialized. Waiting for user dossier.",
        );
        info!(model = client.model(), quiz_length, "Session controller ready");

        Arc::new(Self {
            session: RwLock::new(session),
            analyzer: ProfileAnalyzer::new(client.clone()),
            quiz_engine: QuizEngine::new(client.clone(), quiz_length),
            planner: RoadmapPlanner::new(client),
            tx,
        })
    }

    /// Subscribe to session events. Each observer calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.read().await.snapshot()
    }

    pub async fn log_entries(&self) -> Vec<LogEntry> {
        self.log_since(0).await
    }

    /// Log entries with `seq >= from`, for observers catching up.
    pub async fn log_since(&self, from: usize) -> Vec<LogEntry> {
        self.session.read().await.log.since(from).to_vec()
    }

    /// Full sync message: snapshot plus the whole log, read under one lock.
    pub async fn sync_event(&self) -> SessionEvent {
        let session = self.session.read().await;
        SessionEvent::SessionSync {
            snapshot: session.snapshot(),
            log: session.log.entries().to_vec(),
        }
    }

    /// Analyze a dossier and generate its quiz.
    ///
    /// Profile, quiz and the ASSESSMENT stage are committed together once
    /// both calls succeed. Any failure leaves the session in INTAKE.
    pub async fn submit_dossier(
        &self,
        text: impl Into<String>,
        image: Option<&str>,
    ) -> Result<SessionSnapshot> {
        let dossier = Dossier::parse(text, image)?;

        let issued = {
            let mut session = self.session.write().await;
            if session.stage != Stage::Intake {
                return Err(StateError::WrongStage {
                    operation: "submit_dossier",
                    stage: session.stage,
                }
                .into());
            }
            let issued = session.begin(CallKind::AnalyzeProfile)?;
            self.log(&mut session, LogSource::System, "Adjusting trajectory to ANALYSIS sector.");
            self.publish(&session);
            issued
        };

        let analyzed = self.analyzer.analyze(&dossier).await;
        let profile = {
            let mut session = self.session.write().await;
            self.guard_stale(&session, CallKind::AnalyzeProfile, issued)?;
            let profile = match analyzed {
                Ok(profile) => profile,
                Err(e) => return Err(self.fail(&mut session, e)),
            };
            self.log(
                &mut session,
                LogSource::Analyzer,
                format!("Constellation identified: {}", profile.archetype_name),
            );
            self.log(&mut session, LogSource::System, "Adjusting trajectory to ASSESSMENT sector.");
            session.in_flight = Some(CallKind::GenerateQuiz);
            self.publish(&session);
            profile
        };

        let started = self.quiz_engine.start_quiz(&profile).await;
        let mut session = self.session.write().await;
        self.guard_stale(&session, CallKind::GenerateQuiz, issued)?;
        let quiz = match started {
            Ok(quiz) => quiz,
            Err(e) => return Err(self.fail(&mut session, e)),
        };

        session.in_flight = None;
        session.transition(Stage::Assessment)?;
        let questions = quiz.len();
        session.profile = Some(profile);
        session.quiz = Some(quiz);
        self.log(
            &mut session,
            LogSource::Quiz,
            format!("Assessment charted: {questions} questions."),
        );
        info!(generation = issued, questions, "Entered ASSESSMENT");
        self.publish(&session);
        Ok(session.snapshot())
    }

    /// Score one answer. The answer that completes the quiz is committed
    /// before roadmap generation starts; a roadmap failure is reported in
    /// the returned `roadmap_error` and can be retried with `chart_roadmap`.
    pub async fn answer_question(&self, index: usize) -> Result<AnswerReport> {
        if index >= OPTION_COUNT {
            return Err(ValidationError::AnswerOutOfRange {
                index,
                options: OPTION_COUNT,
            }
            .into());
        }

        let outcome = {
            let mut session = self.session.write().await;
            if session.stage != Stage::Assessment {
                return Err(StateError::WrongStage {
                    operation: "answer_question",
                    stage: session.stage,
                }
                .into());
            }
            if let Some(kind) = session.in_flight {
                return Err(StateError::CallInFlight { kind }.into());
            }
            let quiz = session.quiz.as_mut().ok_or(StateError::WrongStage {
                operation: "answer_question",
                stage: Stage::Assessment,
            })?;
            let outcome = self.quiz_engine.submit_answer(quiz, index)?;

            if let AnswerOutcome::Completed {
                final_score, total, ..
            } = outcome
            {
                self.log(
                    &mut session,
                    LogSource::Quiz,
                    format!("Aptitude aligned ({final_score}/{total}). Constructing roadmap."),
                );
            }
            self.publish(&session);
            if !outcome.is_completed() {
                return Ok(AnswerReport {
                    outcome,
                    snapshot: session.snapshot(),
                    roadmap_error: None,
                });
            }
            outcome
        };

        let roadmap_error = self.chart_roadmap().await.err();
        Ok(AnswerReport {
            outcome,
            snapshot: self.snapshot().await,
            roadmap_error,
        })
    }

    /// Generate the roadmap for a completed quiz, or return the cached one.
    pub async fn chart_roadmap(&self) -> Result<SessionSnapshot> {
        let (profile, issued) = {
            let mut session = self.session.write().await;
            match session.stage {
                Stage::Roadmap => {
                    debug!("Roadmap already charted, reusing");
                    return Ok(session.snapshot());
                }
                Stage::Assessment => {}
                stage => {
                    return Err(StateError::WrongStage {
                        operation: "chart_roadmap",
                        stage,
                    }
                    .into());
                }
            }
            if !session.quiz.as_ref().is_some_and(QuizSession::is_terminal) {
                return Err(StateError::QuizInProgress.into());
            }
            let profile = session.profile.clone().ok_or(StateError::WrongStage {
                operation: "chart_roadmap",
                stage: session.stage,
            })?;
            let issued = session.begin(CallKind::GenerateRoadmap)?;
            self.log(&mut session, LogSource::System, "Adjusting trajectory to ROADMAP sector.");
            self.publish(&session);
            (profile, issued)
        };

        let built = self.planner.build_roadmap(&profile).await;
        let mut session = self.session.write().await;
        self.guard_stale(&session, CallKind::GenerateRoadmap, issued)?;
        let roadmap = match built {
            Ok(roadmap) => roadmap,
            Err(e) => return Err(self.fail(&mut session, e)),
        };

        session.in_flight = None;
        session.transition(Stage::Roadmap)?;
        session.roadmap = Some(RoadmapCursor::new(roadmap));
        self.log(
            &mut session,
            LogSource::System,
            format!("Ascension plan charted for {}.", profile.archetype_name),
        );
        info!(generation = issued, profile_id = %profile.id, "Entered ROADMAP");
        self.publish(&session);
        Ok(session.snapshot())
    }

    pub async fn advance_roadmap(&self) -> Result<SessionSnapshot> {
        self.move_cursor("advance_roadmap", RoadmapCursor::advance).await
    }

    pub async fn retreat_roadmap(&self) -> Result<SessionSnapshot> {
        self.move_cursor("retreat_roadmap", RoadmapCursor::retreat).await
    }

    async fn move_cursor(
        &self,
        operation: &'static str,
        step: fn(&mut RoadmapCursor) -> usize,
    ) -> Result<SessionSnapshot> {
        let mut session = self.session.write().await;
        let stage = session.stage;
        let cursor = session
            .roadmap
            .as_mut()
            .filter(|_| stage == Stage::Roadmap)
            .ok_or(StateError::WrongStage { operation, stage })?;

        let before = cursor.current_index();
        let after = step(cursor);
        debug!(operation, before, after, "Roadmap cursor moved");
        if before != after {
            self.publish(&session);
        }
        Ok(session.snapshot())
    }

    /// Discard profile, quiz and roadmap and return to INTAKE.
    ///
    /// Valid from any stage. The log is kept. Any call still in flight is
    /// orphaned: its result will fail the generation check.
    pub async fn reset(&self) -> SessionSnapshot {
        let mut session = self.session.write().await;
        let previous = session.stage;
        session.generation += 1;
        session.profile = None;
        session.quiz = None;
        session.roadmap = None;
        session.in_flight = None;
        session.stage = Stage::Intake;
        self.log(&mut session, LogSource::System, "Adjusting trajectory to INTAKE sector.");
        info!(from = %previous, generation = session.generation, "Session reset");
        self.publish(&session);
        session.snapshot()
    }

    fn log(&self, session: &mut Session, source: LogSource, message: impl Into<String>) {
        let entry = session.log.append(source, message).clone();
        debug!(source = %entry.source, message = %entry.message, "Navigation log");
        // No receivers is fine.
        let _ = self.tx.send(SessionEvent::LogEntry { entry });
    }

    fn publish(&self, session: &Session) {
        let _ = self.tx.send(SessionEvent::Snapshot {
            snapshot: session.snapshot(),
        });
    }

    fn guard_stale(&self, session: &Session, kind: CallKind, issued: u64) -> Result<()> {
        session.ensure_current(kind, issued).map_err(|e| {
            warn!(kind = %kind, issued, current = session.generation, "Discarding stale result");
            e.into()
        })
    }

    /// Record a generation failure; the stage is left unchanged.
    fn fail(&self, session: &mut Session, err: GenerationError) -> Error {
        warn!(kind = %err.kind, error = %err, stage = %session.stage, "Generation failed");
        session.in_flight = None;
        self.log(
            session,
            LogSource::System,
            format!("Void interference detected: {} failed.", err.kind),
        );
        self.publish(session);
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::GenerationCause;
    use crate::llm::testing::{ScriptedBackend, client};
    use crate::roadmap::MILESTONES;

    fn scan() -> String {
        json!({
            "summary": "Senior backend engineer. Heading for staff-level platform work.",
            "constellationName": "The Forge of Distributed Systems",
            "threatLevel": "LOW",
            "coordinates": [
                {"x": 5, "y": 95}, {"x": 20, "y": 75}, {"x": 45, "y": 55},
                {"x": 70, "y": 30}, {"x": 92, "y": 8}
            ],
        })
        .to_string()
    }

    fn quiz(correct: &[usize]) -> String {
        let questions: Vec<_> = correct
            .iter()
            .map(|c| {
                json!({
                    "question": "Which heading?",
                    "options": ["Hold", "Reroute", "Signal", "Drift"],
                    "correctIndex": c,
                })
            })
            .collect();
        serde_json::to_string(&questions).unwrap()
    }

    fn roadmap() -> String {
        let steps: Vec<_> = MILESTONES
            .iter()
            .map(|p| json!({"phase": p, "instruction": "Master system design", "objective": "Ship"}))
            .collect();
        serde_json::to_string(&steps).unwrap()
    }

    fn messages(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.message.as_str()).collect()
    }

    #[tokio::test]
    async fn starts_in_intake_with_greeting() {
        let backend = ScriptedBackend::new();
        let controller = SessionController::new(client(&backend), 3);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.stage, Stage::Intake);
        assert_eq!(snapshot.log_len, 1);
        let log = controller.log_entries().await;
        assert_eq!(log[0].message, "Astrograph initialized. Waiting for user dossier.");
        assert_eq!(log[0].source, LogSource::System);
    }

    #[tokio::test]
    async fn dossier_enters_assessment_with_log_trail() {
        let backend = ScriptedBackend::new();
        backend.push_ok(scan());
        backend.push_ok(quiz(&[0, 1, 2]));
        let controller = SessionController::new(client(&backend), 3);

        let snapshot = controller
            .submit_dossier("Senior backend engineer, 8 years, Go and distributed systems", None)
            .await
            .unwrap();

        assert_eq!(snapshot.stage, Stage::Assessment);
        assert_eq!(snapshot.pending, None);
        assert_eq!(
            snapshot.profile.unwrap().archetype_name,
            "The Forge of Distributed Systems"
        );
        assert_eq!(snapshot.quiz.unwrap().total, 3);
        assert_eq!(snapshot.chart.unwrap().points.len(), 5);

        let log = controller.log_entries().await;
        assert_eq!(
            messages(&log[1..]),
            vec![
                "Adjusting trajectory to ANALYSIS sector.",
                "Constellation identified: The Forge of Distributed Systems",
                "Adjusting trajectory to ASSESSMENT sector.",
                "Assessment charted: 3 questions.",
            ]
        );
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn empty_dossier_never_reaches_backend() {
        let backend = ScriptedBackend::new();
        let controller = SessionController::new(client(&backend), 3);

        let err = controller.submit_dossier("  ", None).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::EmptyDossier)));
        assert_eq!(backend.calls(), 0);
        assert_eq!(controller.snapshot().await.log_len, 1);
    }

    #[tokio::test]
    async fn out_of_range_answer_is_validation_even_in_intake() {
        let controller = SessionController::new(client(&ScriptedBackend::new()), 3);
        let err = controller.answer_question(4).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::AnswerOutOfRange { index: 4, options: 4 })
        ));
    }

    #[tokio::test]
    async fn malformed_profile_leaves_intake_and_retry_calls_again() {
        let backend = ScriptedBackend::new();
        backend.push_ok("{ this is not json");
        let controller = SessionController::new(client(&backend), 3);

        let err = controller.submit_dossier("Go engineer", None).await.unwrap_err();
        match err {
            Error::Generation(e) => {
                assert_eq!(e.kind, CallKind::AnalyzeProfile);
                assert!(matches!(e.cause, GenerationCause::MalformedJson(_)));
            }
            other => panic!("expected generation error, got {other:?}"),
        }
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.stage, Stage::Intake);
        assert!(snapshot.profile.is_none());
        assert!(snapshot.pending.is_none());
        let log = controller.log_entries().await;
        assert_eq!(
            log.last().unwrap().message,
            "Void interference detected: ANALYZE_PROFILE failed."
        );

        backend.push_ok(scan());
        backend.push_ok(quiz(&[0]));
        controller.submit_dossier("Go engineer", None).await.unwrap();
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn quiz_failure_commits_nothing() {
        let backend = ScriptedBackend::new();
        backend.push_ok(scan());
        backend.push_err("connection reset");
        let controller = SessionController::new(client(&backend), 3);

        let err = controller.submit_dossier("Go engineer", None).await.unwrap_err();
        assert!(matches!(err, Error::Generation(ref e) if e.kind == CallKind::GenerateQuiz));
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.stage, Stage::Intake);
        assert!(snapshot.profile.is_none());
        assert!(snapshot.quiz.is_none());
    }

    #[tokio::test]
    async fn full_flow_reaches_roadmap() {
        let backend = ScriptedBackend::new();
        backend.push_ok(scan());
        backend.push_ok(quiz(&[1, 2, 3]));
        backend.push_ok(roadmap());
        let controller = SessionController::new(client(&backend), 3);
        controller.submit_dossier("Go engineer", None).await.unwrap();

        let first = controller.answer_question(1).await.unwrap();
        assert!(!first.outcome.is_completed());
        controller.answer_question(0).await.unwrap();
        let last = controller.answer_question(3).await.unwrap();

        assert_eq!(
            last.outcome,
            AnswerOutcome::Completed { correct: true, final_score: 2, total: 3 }
        );
        assert!(last.roadmap_error.is_none());
        assert_eq!(last.snapshot.stage, Stage::Roadmap);
        let view = last.snapshot.roadmap.unwrap();
        assert_eq!(view.current_index, 0);
        assert_eq!(view.steps[0].step.phase, "Awakening");

        let log = controller.log_entries().await;
        let tail: Vec<_> = messages(&log).into_iter().rev().take(3).rev().collect();
        assert_eq!(
            tail,
            vec![
                "Aptitude aligned (2/3). Constructing roadmap.",
                "Adjusting trajectory to ROADMAP sector.",
                "Ascension plan charted for The Forge of Distributed Systems.",
            ]
        );
    }

    #[tokio::test]
    async fn roadmap_failure_keeps_assessment_and_can_be_retried() {
        let backend = ScriptedBackend::new();
        backend.push_ok(scan());
        backend.push_ok(quiz(&[0]));
        backend.push_err("timeout");
        let controller = SessionController::new(client(&backend), 1);
        controller.submit_dossier("Go engineer", None).await.unwrap();

        let report = controller.answer_question(0).await.unwrap();
        assert!(report.outcome.is_completed());
        assert!(matches!(report.roadmap_error, Some(Error::Generation(_))));
        assert_eq!(report.snapshot.stage, Stage::Assessment);
        assert!(report.snapshot.quiz.unwrap().completed);

        // Answering again is rejected; the quiz is done.
        assert!(matches!(
            controller.answer_question(0).await,
            Err(Error::State(StateError::QuizCompleted))
        ));

        backend.push_ok(roadmap());
        let snapshot = controller.chart_roadmap().await.unwrap();
        assert_eq!(snapshot.stage, Stage::Roadmap);
    }

    #[tokio::test]
    async fn chart_roadmap_reuses_cached_roadmap() {
        let backend = ScriptedBackend::new();
        backend.push_ok(scan());
        backend.push_ok(quiz(&[0]));
        backend.push_ok(roadmap());
        let controller = SessionController::new(client(&backend), 1);
        controller.submit_dossier("Go engineer", None).await.unwrap();
        controller.answer_question(0).await.unwrap();
        assert_eq!(backend.calls(), 3);

        let again = controller.chart_roadmap().await.unwrap();
        assert_eq!(again.stage, Stage::Roadmap);
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn chart_roadmap_requires_finished_quiz() {
        let backend = ScriptedBackend::new();
        backend.push_ok(scan());
        backend.push_ok(quiz(&[0, 0]));
        let controller = SessionController::new(client(&backend), 2);

        assert!(matches!(
            controller.chart_roadmap().await,
            Err(Error::State(StateError::WrongStage { stage: Stage::Intake, .. }))
        ));
        controller.submit_dossier("Go engineer", None).await.unwrap();
        assert!(matches!(
            controller.chart_roadmap().await,
            Err(Error::State(StateError::QuizInProgress))
        ));
    }

    #[tokio::test]
    async fn intents_in_wrong_stage_are_rejected() {
        let backend = ScriptedBackend::new();
        let controller = SessionController::new(client(&backend), 3);

        assert!(matches!(
            controller.answer_question(0).await,
            Err(Error::State(StateError::WrongStage { operation: "answer_question", .. }))
        ));
        assert!(matches!(
            controller.advance_roadmap().await,
            Err(Error::State(StateError::WrongStage { operation: "advance_roadmap", .. }))
        ));
        assert!(matches!(
            controller.retreat_roadmap().await,
            Err(Error::State(StateError::WrongStage { .. }))
        ));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn roadmap_navigation_clamps() {
        let backend = ScriptedBackend::new();
        backend.push_ok(scan());
        backend.push_ok(quiz(&[0]));
        backend.push_ok(roadmap());
        let controller = SessionController::new(client(&backend), 1);
        controller.submit_dossier("Go engineer", None).await.unwrap();
        controller.answer_question(0).await.unwrap();

        let at_start = controller.retreat_roadmap().await.unwrap();
        assert_eq!(at_start.roadmap.unwrap().current_index, 0);

        let mut last = None;
        for _ in 0..7 {
            last = Some(controller.advance_roadmap().await.unwrap());
        }
        let view = last.unwrap().roadmap.unwrap();
        assert_eq!(view.current_index, 4);
        assert_eq!(view.current_step.phase, "Apex");
    }

    #[tokio::test]
    async fn reset_is_idempotent_and_keeps_log() {
        let backend = ScriptedBackend::new();
        backend.push_ok(scan());
        backend.push_ok(quiz(&[0, 1]));
        let controller = SessionController::new(client(&backend), 2);
        controller.submit_dossier("Go engineer", None).await.unwrap();
        let before = controller.snapshot().await.log_len;

        let first = controller.reset().await;
        assert_eq!(first.stage, Stage::Intake);
        assert!(first.profile.is_none() && first.quiz.is_none() && first.roadmap.is_none());
        assert_eq!(first.log_len, before + 1);

        let second = controller.reset().await;
        assert_eq!(second.stage, Stage::Intake);
        assert_eq!(second.generation, first.generation + 1);
        assert!(second.log_len > first.log_len);
        assert_eq!(
            controller.log_entries().await.last().unwrap().message,
            "Adjusting trajectory to INTAKE sector."
        );
    }

    #[tokio::test]
    async fn events_are_broadcast() {
        let backend = ScriptedBackend::new();
        let controller = SessionController::new(client(&backend), 3);
        let mut rx = controller.subscribe();

        controller.reset().await;

        match rx.recv().await.unwrap() {
            SessionEvent::LogEntry { entry } => {
                assert_eq!(entry.message, "Adjusting trajectory to INTAKE sector.")
            }
            other => panic!("expected log entry, got {other:?}"),
        }
        match rx.recv().await.unwrap() {
            SessionEvent::Snapshot { snapshot } => assert_eq!(snapshot.generation, 1),
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sync_event_carries_full_log() {
        let backend = ScriptedBackend::new();
        let controller = SessionController::new(client(&backend), 3);
        controller.reset().await;

        match controller.sync_event().await {
            SessionEvent::SessionSync { snapshot, log } => {
                assert_eq!(log.len(), 2);
                assert_eq!(snapshot.log_len, 2);
            }
            other => panic!("expected sync, got {other:?}"),
        }
    }
}
