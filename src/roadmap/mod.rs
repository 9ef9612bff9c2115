//! Five-phase career roadmap, generated once per completed quiz.

pub mod model;
pub mod planner;

pub use model::{AscensionStep, MILESTONES, ROADMAP_LEN, Roadmap, RoadmapCursor};
pub use planner::RoadmapPlanner;
