//! Stage machine: tracks which sector of the flow the session is in.

use serde::{Deserialize, Serialize};

/// Stages of a session.
///
/// Committed progression is Intake → Assessment → Roadmap, with a reset edge
/// from any stage back to Intake. Analysis is transient: it is reported while
/// the profile call is in flight but never committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    #[default]
    Intake,
    Analysis,
    Assessment,
    Roadmap,
}

impl Stage {
    /// Check if a committed transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, target),
            (Intake, Assessment) | (Assessment, Roadmap) | (_, Intake)
        )
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intake => "INTAKE",
            Self::Analysis => "ANALYSIS",
            Self::Assessment => "ASSESSMENT",
            Self::Roadmap => "ROADMAP",
        };
        write!(f, "{s}")
    }
}
