//! ProfileAnalyzer: turns a dossier into a `Profile`.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::model::{
    COORDINATE_MAX, COORDINATE_MIN, Coordinate, Profile, RiskLevel, TRAJECTORY_LEN, Trajectory,
};
use crate::error::{GenerationError, SchemaViolation, ValidationError};
use crate::llm::{CallKind, CallPayload, GenerativeClient, ImageAttachment};

/// User-submitted career material. At least one of text or image is present.
#[derive(Debug, Clone)]
pub struct Dossier {
    text: String,
    image: Option<ImageAttachment>,
}

impl Dossier {
    pub fn new(
        text: impl Into<String>,
        image: Option<ImageAttachment>,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        let image = image.filter(|i| !i.bytes.is_empty());
        if text.trim().is_empty() && image.is_none() {
            return Err(ValidationError::EmptyDossier);
        }
        Ok(Self { text, image })
    }

    /// Build from request fields, decoding an optional data-URL image.
    pub fn parse(text: impl Into<String>, image: Option<&str>) -> Result<Self, ValidationError> {
        let image = match image.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(ImageAttachment::from_data_url(raw)?),
            None => None,
        };
        Self::new(text, image)
    }
}

/// ANALYZE_PROFILE response as it comes over the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanResult {
    summary: String,
    constellation_name: String,
    threat_level: RiskLevel,
    coordinates: Vec<WireCoordinate>,
}

#[derive(Debug, Deserialize)]
struct WireCoordinate {
    x: f64,
    y: f64,
}

/// Produces profiles through the generative client. Holds no state.
pub struct ProfileAnalyzer {
    client: Arc<GenerativeClient>,
}

impl ProfileAnalyzer {
    pub fn new(client: Arc<GenerativeClient>) -> Self {
        Self { client }
    }

    pub async fn analyze(&self, dossier: &Dossier) -> Result<Profile, GenerationError> {
        let scan: ScanResult = self
            .client
            .invoke_as(CallPayload::AnalyzeProfile {
                dossier: dossier.text.clone(),
                image: dossier.image.clone(),
            })
            .await?;

        let profile = into_profile(scan)?;
        info!(
            profile_id = %profile.id,
            archetype = %profile.archetype_name,
            risk = %profile.risk_level,
            "Profile analyzed"
        );
        Ok(profile)
    }
}

fn into_profile(scan: ScanResult) -> Result<Profile, GenerationError> {
    let kind = CallKind::AnalyzeProfile;
    let found = scan.coordinates.len();

    let points = scan
        .coordinates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Coordinate::new(c.x, c.y).ok_or_else(|| {
                GenerationError::new(
                    kind,
                    SchemaViolation::OutOfRange {
                        path: format!("$.coordinates[{i}]"),
                        value: if (COORDINATE_MIN..=COORDINATE_MAX).contains(&c.x) {
                            c.y
                        } else {
                            c.x
                        },
                        min: COORDINATE_MIN,
                        max: COORDINATE_MAX,
                    },
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let trajectory = Trajectory::from_points(points).ok_or_else(|| {
        GenerationError::new(
            kind,
            SchemaViolation::WrongLength {
                path: "$.coordinates".to_string(),
                expected: format!("exactly {TRAJECTORY_LEN}"),
                found,
            },
        )
    })?;

    Ok(Profile::new(
        scan.summary,
        scan.constellation_name,
        scan.threat_level,
        trajectory,
    ))
}
