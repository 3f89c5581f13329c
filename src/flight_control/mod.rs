//! Aircraft-level state: the phase graph, the state machine walking it, the
//! telemetry snapshot driving its transitions and the loaded flight plan.

mod flight_phase;
mod flight_plan;
mod flight_state_machine;
mod telemetry;

pub use flight_phase::FlightPhase;
pub use flight_plan::{FlightPlan, FlightPlanSource};
pub use flight_state_machine::{FlightStateMachine, TransitionError};
pub use telemetry::{TelemetryError, TelemetrySnapshot, TelemetrySource};
