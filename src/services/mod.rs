//! Orchestration over the stores: the thin score-editor operations and the
//! user-facing archive flows.

pub mod archive_service;
pub mod game_service;
