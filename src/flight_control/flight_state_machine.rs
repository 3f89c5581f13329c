use super::flight_phase::FlightPhase;
use crate::{info, warn};
use std::time::Duration;
use strum_macros::Display;

/// Returned when a requested phase change is not an edge of the phase graph.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum TransitionError {
    #[strum(to_string = "invalid transition {from} -> {to}")]
    NotAllowed { from: FlightPhase, to: FlightPhase },
}

impl std::error::Error for TransitionError {}

/// Holds the current and previous [`FlightPhase`] and enforces the directed
/// transition graph between them.
#[derive(Debug)]
pub struct FlightStateMachine {
    current: FlightPhase,
    previous: FlightPhase,
    /// Set once the machine entered `Flight` via the in-flight start override.
    in_flight_start: bool,
}

impl Default for FlightStateMachine {
    fn default() -> Self { Self::new() }
}

impl FlightStateMachine {
    pub fn new() -> Self {
        Self {
            current: FlightPhase::Preflight,
            previous: FlightPhase::Preflight,
            in_flight_start: false,
        }
    }

    pub fn current(&self) -> FlightPhase { self.current }
    #[cfg(test)]
    pub fn previous(&self) -> FlightPhase { self.previous }
    pub fn was_in_flight_start(&self) -> bool { self.in_flight_start }

    /// Tick interval for the current phase.
    pub fn poll_interval(&self) -> Duration { self.current.poll_interval() }

    pub fn can_transition(&self, to: FlightPhase) -> bool { self.current.successors().contains(&to) }

    /// Moves to `to` if it is a documented successor of the current phase.
    /// On rejection the state is left untouched.
    pub fn transition(&mut self, to: FlightPhase) -> Result<(), TransitionError> {
        if !self.can_transition(to) {
            let err = TransitionError::NotAllowed { from: self.current, to };
            warn!("Rejected phase change: {err}");
            return Err(err);
        }
        self.apply(to);
        Ok(())
    }

    /// Jumps from `Preflight` straight to `Flight`. Only valid in `Preflight`.
    pub fn override_in_flight_start(&mut self) -> Result<(), TransitionError> {
        if self.current != FlightPhase::Preflight {
            let err = TransitionError::NotAllowed { from: self.current, to: FlightPhase::Flight };
            warn!("Rejected in-flight start override: {err}");
            return Err(err);
        }
        self.in_flight_start = true;
        self.apply(FlightPhase::Flight);
        Ok(())
    }

    fn apply(&mut self, to: FlightPhase) {
        self.previous = self.current;
        self.current = to;
        info!(
            "Phase {} -> {}, polling every {}ms.",
            self.previous,
            self.current,
            self.poll_interval().as_millis()
        );
    }
}
