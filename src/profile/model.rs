//! Profile data model: coordinates, trajectories, and their chart mapping.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const COORDINATE_MIN: f64 = 0.0;
pub const COORDINATE_MAX: f64 = 100.0;
/// Number of milestones in a trajectory.
pub const TRAJECTORY_LEN: usize = 5;

/// Chart labels, index 0 = foundation, index 4 = apex.
pub const CHART_MILESTONES: [&str; TRAJECTORY_LEN] = [
    "FOUNDATION",
    "ENTRY LEVEL",
    "CORE MASTERY",
    "SPECIALIZATION",
    "APEX",
];

/// Default square viewbox size used when charting a trajectory.
pub const DEFAULT_VIEWBOX: f64 = 500.0;

/// A point on the career chart, both axes in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    x: f64,
    y: f64,
}

impl Coordinate {
    /// Returns `None` if either axis is non-finite or outside [0, 100].
    pub fn new(x: f64, y: f64) -> Option<Self> {
        let in_range = |v: f64| v.is_finite() && (COORDINATE_MIN..=COORDINATE_MAX).contains(&v);
        (in_range(x) && in_range(y)).then_some(Self { x, y })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// Exactly five ordered coordinates, foundation first, apex last.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory([Coordinate; TRAJECTORY_LEN]);

impl Trajectory {
    /// Returns `None` unless exactly five coordinates are given.
    pub fn from_points(points: Vec<Coordinate>) -> Option<Self> {
        let points: [Coordinate; TRAJECTORY_LEN] = points.try_into().ok()?;
        Some(Self(points))
    }

    pub fn points(&self) -> &[Coordinate; TRAJECTORY_LEN] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<Coordinate> {
        self.0.get(index).copied()
    }

    pub fn apex(&self) -> Coordinate {
        self.0[TRAJECTORY_LEN - 1]
    }

    /// Map the trajectory onto a square viewbox of side `viewbox`.
    pub fn chart(&self, viewbox: f64) -> TrajectoryChart {
        let scale = |v: f64| v * viewbox / COORDINATE_MAX;

        let points: Vec<ChartPoint> = self
            .0
            .iter()
            .enumerate()
            .map(|(index, c)| ChartPoint {
                index,
                label: CHART_MILESTONES[index],
                x: scale(c.x),
                y: scale(c.y),
                apex: index == TRAJECTORY_LEN - 1,
            })
            .collect();

        let path = points
            .iter()
            .map(|p| {
                let cmd = if p.index == 0 { "M" } else { "L" };
                format!("{cmd} {} {}", p.x, p.y)
            })
            .collect::<Vec<_>>()
            .join(" ");

        TrajectoryChart {
            viewbox,
            points,
            path,
        }
    }
}

/// One scaled, labelled point of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub index: usize,
    pub label: &'static str,
    pub x: f64,
    pub y: f64,
    pub apex: bool,
}

/// Viewbox-space rendering data for a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryChart {
    pub viewbox: f64,
    pub points: Vec<ChartPoint>,
    /// Polyline path through the points, e.g. `M 50 450 L 125 350 ...`.
    pub path: String,
}

/// Risk classification of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Steady growth.
    Low,
    /// Pivoting or transforming.
    Medium,
    /// High-risk, high-reward innovator.
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// The analyzed result of a dossier. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub summary: String,
    pub archetype_name: String,
    pub risk_level: RiskLevel,
    pub trajectory: Trajectory,
}

impl Profile {
    pub fn new(
        summary: impl Into<String>,
        archetype_name: impl Into<String>,
        risk_level: RiskLevel,
        trajectory: Trajectory,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            summary: summary.into(),
            archetype_name: archetype_name.into(),
            risk_level,
            trajectory,
        }
    }

    /// Context line handed to quiz generation: "<archetype>: <summary>".
    pub fn quiz_context(&self) -> String {
        let summary = if self.summary.trim().is_empty() {
            "Voyager"
        } else {
            self.summary.as_str()
        };
        format!("{}: {}", self.archetype_name, summary)
    }
}

#[cfg(test)]
pub(crate) fn sample_trajectory() -> Trajectory {
    let points = [(10.0, 90.0), (20.0, 70.0), (40.0, 50.0), (70.0, 30.0), (90.0, 10.0)]
        .into_iter()
        .filter_map(|(x, y)| Coordinate::new(x, y))
        .collect();
    Trajectory::from_points(points).unwrap()
}
