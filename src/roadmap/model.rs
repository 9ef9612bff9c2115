//! Ascension roadmap and its navigation cursor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of steps in a roadmap.
pub const ROADMAP_LEN: usize = 5;

/// Phase names, in order.
pub const MILESTONES: [&str; ROADMAP_LEN] =
    ["Awakening", "Ascension", "Alignment", "Radiance", "Apex"];

/// One phase of career advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AscensionStep {
    pub phase: String,
    pub instruction: String,
    pub objective: String,
}

/// Five steps generated for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roadmap {
    pub profile_id: Uuid,
    steps: [AscensionStep; ROADMAP_LEN],
}

impl Roadmap {
    /// Returns `None` unless exactly five steps are given.
    pub fn new(profile_id: Uuid, steps: Vec<AscensionStep>) -> Option<Self> {
        let steps: [AscensionStep; ROADMAP_LEN] = steps.try_into().ok()?;
        Some(Self { profile_id, steps })
    }

    pub fn steps(&self) -> &[AscensionStep; ROADMAP_LEN] {
        &self.steps
    }
}

/// A roadmap plus the index of the step on display.
///
/// The index is always in `0..ROADMAP_LEN`. Moving past either end is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapCursor {
    roadmap: Roadmap,
    current: usize,
}

impl RoadmapCursor {
    pub fn new(roadmap: Roadmap) -> Self {
        Self {
            roadmap,
            current: 0,
        }
    }

    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &AscensionStep {
        &self.roadmap.steps[self.current]
    }

    /// Move one step forward; returns the new index.
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1).min(ROADMAP_LEN - 1);
        self.current
    }

    /// Move one step back; returns the new index.
    pub fn retreat(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }
}

#[cfg(test)]
pub(crate) fn sample_roadmap(profile_id: Uuid) -> Roadmap {
    let steps = MILESTONES
        .iter()
        .map(|phase| AscensionStep {
            phase: phase.to_string(),
            instruction: format!("{phase} instruction"),
            objective: format!("{phase} objective"),
        })
        .collect();
    Roadmap::new(profile_id, steps).unwrap()
}
