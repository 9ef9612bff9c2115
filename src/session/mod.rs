//! The single-user session: stage machine, navigation log, controller,
//! and the HTTP/WebSocket surface over them.

pub mod controller;
pub mod log;
pub mod model;
pub mod routes;
pub mod state;
pub mod ws;

pub use controller::{AnswerReport, SessionController};
pub use log::{LogEntry, LogSource, NavigationLog};
pub use model::{RoadmapView, SessionAction, SessionEvent, SessionSnapshot};
pub use routes::{AppState, session_routes};
pub use state::Stage;
