//! Profile analysis: from a free-text/image dossier to an archetype with a
//! five-point career trajectory.

pub mod analyzer;
pub mod model;

pub use analyzer::{Dossier, ProfileAnalyzer};
pub use model::{ChartPoint, Coordinate, Profile, RiskLevel, Trajectory, TrajectoryChart};
