//! Astrograph: career cartography over a generative backend.
//!
//! A dossier is analyzed into a profile with a five-point trajectory, the
//! profile seeds an aptitude quiz, and the completed quiz unlocks a
//! five-phase roadmap. One session at a time, driven over HTTP/WebSocket.

pub mod config;
pub mod error;
pub mod llm;
pub mod profile;
pub mod quiz;
pub mod roadmap;
pub mod session;
