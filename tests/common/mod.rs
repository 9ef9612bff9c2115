//! Shared fixtures for integration tests: a scripted generative backend
//! and canned responses for each call kind.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use astrograph::error::BackendError;
use astrograph::llm::{CallKind, GenerationRequest, GenerativeBackend, GenerativeClient};
use astrograph::roadmap::MILESTONES;
use astrograph::session::SessionController;

/// Maximum time any test is allowed to run before we consider it hung.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub const FORGE: &str = "The Forge of Distributed Systems";

enum Step {
    Reply(String),
    Fail(String),
    /// Reply only once the gate is opened.
    Gated(String, Arc<Notify>),
}

/// Stub backend (no real API calls). Replays queued steps in order and
/// records every request it sees.
#[derive(Default)]
pub struct ScriptedBackend {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, body: impl Into<String>) {
        self.steps.lock().unwrap().push_back(Step::Reply(body.into()));
    }

    pub fn fail(&self, reason: impl Into<String>) {
        self.steps.lock().unwrap().push_back(Step::Fail(reason.into()));
    }

    /// Queue a reply held back until the returned gate is notified.
    pub fn gated(&self, body: impl Into<String>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.steps
            .lock()
            .unwrap()
            .push_back(Step::Gated(body.into(), gate.clone()));
        gate
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn kinds(&self) -> Vec<CallKind> {
        self.requests.lock().unwrap().iter().map(|r| r.kind).collect()
    }

    pub fn request(&self, index: usize) -> GenerationRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(body)) => Ok(body),
            Some(Step::Gated(body, gate)) => {
                gate.notified().await;
                Ok(body)
            }
            Some(Step::Fail(reason)) => Err(BackendError::RequestFailed {
                provider: "scripted".to_string(),
                reason,
            }),
            None => Err(BackendError::RequestFailed {
                provider: "scripted".to_string(),
                reason: "script exhausted".to_string(),
            }),
        }
    }
}

pub fn controller(backend: &Arc<ScriptedBackend>, quiz_length: usize) -> Arc<SessionController> {
    let client = GenerativeClient::new(backend.clone(), "test-model");
    SessionController::new(Arc::new(client), quiz_length)
}

// ── Canned responses ─────────────────────────────────────────────────

pub fn scan_json(name: &str) -> String {
    json!({
        "summary": "Seasoned backend engineer with deep Go and distributed systems expertise. \
                    Poised for staff-level platform leadership.",
        "constellationName": name,
        "threatLevel": "LOW",
        "coordinates": [
            {"x": 8, "y": 92}, {"x": 25, "y": 70}, {"x": 48, "y": 52},
            {"x": 72, "y": 28}, {"x": 94, "y": 6}
        ],
    })
    .to_string()
}

/// One question per entry; each entry is that question's correct index.
pub fn quiz_json(correct: &[usize]) -> String {
    let questions: Vec<_> = correct
        .iter()
        .enumerate()
        .map(|(i, c)| {
            json!({
                "question": format!("A nebula blocks sector {i}. Which heading do you take?"),
                "options": ["Hold the course", "Chart a detour", "Rally the fleet", "Scout ahead"],
                "correctIndex": c,
            })
        })
        .collect();
    serde_json::to_string(&questions).unwrap()
}

pub fn roadmap_json() -> String {
    let steps: Vec<_> = MILESTONES
        .iter()
        .map(|phase| {
            json!({
                "phase": phase,
                "instruction": format!("{phase}: master GraphQL and system design"),
                "objective": format!("{phase} objective"),
            })
        })
        .collect();
    serde_json::to_string(&steps).unwrap()
}

/// Poll until `check` passes or the test timeout elapses.
pub async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + TEST_TIMEOUT;
    while !check().await {
        assert!(tokio::time::Instant::now() < deadline, "condition never held");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
