//! Presentation snapshots and observer events.

use serde::{Deserialize, Serialize};

use super::log::LogEntry;
use super::state::Stage;
use crate::llm::CallKind;
use crate::profile::model::CHART_MILESTONES;
use crate::profile::{Coordinate, Profile, TrajectoryChart};
use crate::quiz::QuizView;
use crate::roadmap::{AscensionStep, RoadmapCursor};

/// Read-only view of the session for the presentation layer.
///
/// Quiz questions are exposed without their answer key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Bumped by every reset.
    pub generation: u64,
    /// Observed stage: `ANALYSIS` while intake calls are in flight.
    pub stage: Stage,
    /// Backend call currently outstanding, if any.
    pub pending: Option<CallKind>,
    pub profile: Option<Profile>,
    pub chart: Option<TrajectoryChart>,
    pub quiz: Option<QuizView>,
    pub roadmap: Option<RoadmapView>,
    pub log_len: usize,
}

/// One roadmap step plotted against its trajectory coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlottedStep {
    pub index: usize,
    pub label: &'static str,
    pub coordinate: Option<Coordinate>,
    #[serde(flatten)]
    pub step: AscensionStep,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapView {
    pub steps: Vec<PlottedStep>,
    pub current_index: usize,
    pub current_step: AscensionStep,
}

impl RoadmapView {
    pub fn new(cursor: &RoadmapCursor, profile: Option<&Profile>) -> Self {
        let steps = cursor
            .roadmap()
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| PlottedStep {
                index,
                label: CHART_MILESTONES[index],
                coordinate: profile.and_then(|p| p.trajectory.get(index)),
                step: step.clone(),
            })
            .collect();
        Self {
            steps,
            current_index: cursor.current_index(),
            current_step: cursor.current_step().clone(),
        }
    }
}

/// Messages sent to observers over the WebSocket feed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Full state (sent on connect and after a lag).
    SessionSync {
        snapshot: SessionSnapshot,
        log: Vec<LogEntry>,
    },
    /// A navigation log entry was appended.
    LogEntry { entry: LogEntry },
    /// Session state changed.
    Snapshot { snapshot: SessionSnapshot },
    /// An intent sent over the socket was rejected. Only sent to that client.
    Error { error: String, message: String },
}

/// Intents a WebSocket client may send.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    SubmitDossier {
        #[serde(default)]
        text: String,
        #[serde(default)]
        image: Option<String>,
    },
    AnswerQuestion { index: usize },
    ChartRoadmap,
    AdvanceRoadmap,
    RetreatRoadmap,
    Reset,
}
