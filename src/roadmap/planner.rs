//! RoadmapPlanner: generates the five-phase ascension plan for a profile.

use std::sync::Arc;

use tracing::{info, warn};

use super::model::{AscensionStep, MILESTONES, ROADMAP_LEN, Roadmap};
use crate::error::{GenerationError, SchemaViolation};
use crate::llm::{CallKind, CallPayload, GenerativeClient};
use crate::profile::Profile;

pub struct RoadmapPlanner {
    client: Arc<GenerativeClient>,
}

impl RoadmapPlanner {
    pub fn new(client: Arc<GenerativeClient>) -> Self {
        Self { client }
    }

    pub async fn build_roadmap(&self, profile: &Profile) -> Result<Roadmap, GenerationError> {
        let steps: Vec<AscensionStep> = self
            .client
            .invoke_as(CallPayload::GenerateRoadmap {
                constellation: profile.archetype_name.clone(),
                summary: profile.summary.clone(),
                phases: MILESTONES.to_vec(),
            })
            .await?;

        // Phase labels are free text; an unexpected name is kept as-is.
        for (step, expected) in steps.iter().zip(MILESTONES) {
            if !step.phase.eq_ignore_ascii_case(expected) {
                warn!(expected, got = %step.phase, "Roadmap phase name differs from milestone");
            }
        }

        let found = steps.len();
        let roadmap = Roadmap::new(profile.id, steps).ok_or_else(|| {
            GenerationError::new(
                CallKind::GenerateRoadmap,
                SchemaViolation::WrongLength {
                    path: "$".to_string(),
                    expected: format!("exactly {ROADMAP_LEN}"),
                    found,
                },
            )
        })?;

        info!(profile_id = %profile.id, "Roadmap charted");
        Ok(roadmap)
    }
}
