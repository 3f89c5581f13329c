//! This module drives the turnaround: the per-flight session state, the
//! orchestrator running the phase handlers on every tick and the status hub
//! exposing its progress to the outside.

mod orchestrator;
mod status_hub;
mod turnaround_session;

pub use orchestrator::TurnaroundOrchestrator;
pub use status_hub::StatusHub;
