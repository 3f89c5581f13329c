use super::{
    automation::{AdapterError, AutomationAdapter},
    menu_channel::{MenuCommand, MenuCommandChannel, MenuError},
    variables,
};
use crate::{log, svc, warn};
use std::time::Duration;
use tokio::time::Instant;

/// Progress of the refueling service for the current session.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RefuelingState {
    pub requested: bool,
    pub active: bool,
    pub paused: bool,
    pub complete: bool,
    pub current_kg: f64,
    pub target_kg: f64,
}

/// Drives the refueling truck and mirrors its progress into the aircraft's
/// fuel quantity with a continuous fill model.
#[derive(Debug)]
pub struct RefuelingCoordinator {
    state: RefuelingState,
    /// Fuel flow in kg per second.
    rate_kgs: f64,
    hydraulic_level: f64,
}

impl RefuelingCoordinator {
    pub fn new(rate_kgs: f64, hydraulic_level: f64) -> Self {
        Self { state: RefuelingState::default(), rate_kgs, hydraulic_level }
    }

    pub fn state(&self) -> &RefuelingState { &self.state }
    pub fn is_requested(&self) -> bool { self.state.requested }
    pub fn is_active(&self) -> bool { self.state.active }
    pub fn is_paused(&self) -> bool { self.state.paused }
    pub fn is_complete(&self) -> bool { self.state.complete }

    /// A target is set and equals the planned block fuel.
    pub fn target_matches(&self, planned_kg: f64) -> bool {
        self.state.target_kg > 0.0 && (self.state.target_kg - planned_kg).abs() < 1.0
    }

    pub async fn set_target(
        &mut self,
        adapter: &dyn AutomationAdapter,
        planned_kg: f64,
    ) -> Result<(), AdapterError> {
        adapter.write_var(variables::FUEL_TARGET_KG, planned_kg).await?;
        self.state.target_kg = planned_kg;
        Ok(())
    }

    /// Defuels the aircraft down to the planned quantity if it holds more,
    /// otherwise keeps the current quantity as starting point.
    pub async fn set_initial_fuel(&mut self, adapter: &dyn AutomationAdapter) -> Result<(), AdapterError> {
        let on_board = adapter.read_var(variables::FUEL_TOTAL_KG).await?;
        let initial = if self.state.target_kg > 0.0 { on_board.min(self.state.target_kg) } else { on_board };
        adapter.write_var(variables::FUEL_TOTAL_KG, initial).await?;
        self.state.current_kg = initial;
        log!("Initial fuel set to {initial:.0}kg (target {:.0}kg).", self.state.target_kg);
        Ok(())
    }

    pub async fn set_hydraulic_fluid_levels(&self, adapter: &dyn AutomationAdapter) -> Result<(), AdapterError> {
        for reservoir in variables::HYD_RESERVOIRS {
            adapter.write_var(reservoir, self.hydraulic_level).await?;
        }
        log!("Hydraulic reservoirs filled to {:.2}.", self.hydraulic_level);
        Ok(())
    }

    pub fn request_refueling(&mut self, menu: &mut MenuCommandChannel, now: Instant) -> Result<(), MenuError> {
        if self.state.requested {
            return Ok(());
        }
        menu.submit(MenuCommand::RequestRefuel, now)?;
        self.state.requested = true;
        svc!("Refuel requested, {:.0}kg -> {:.0}kg.", self.state.current_kg, self.state.target_kg);
        Ok(())
    }

    /// The menu command behind the last request failed, retry on a later tick.
    pub fn on_request_failed(&mut self) {
        if !self.state.active && !self.state.complete {
            self.state.requested = false;
        }
    }

    /// Marks the truck as pumping. Ignored unless refueling was requested.
    pub fn set_active(&mut self) -> bool {
        if !self.state.requested {
            warn!("Refueling reported active without being requested!");
            return false;
        }
        if !self.state.active {
            self.state.active = true;
            svc!("Refueling active.");
        }
        true
    }

    /// Fuel hose disconnected while filling. Progress and latches are kept.
    pub fn pause(&mut self) {
        if self.state.active && !self.state.paused {
            self.state.paused = true;
            svc!("Refueling paused at {:.0}kg.", self.state.current_kg);
        }
    }

    pub fn resume(&mut self) {
        if self.state.paused {
            self.state.paused = false;
            svc!("Refueling resumed at {:.0}kg.", self.state.current_kg);
        }
    }

    /// Advances the fill model by `dt` and writes the new quantity. Returns
    /// whether the target is reached.
    pub async fn process_refueling(
        &mut self,
        adapter: &dyn AutomationAdapter,
        dt: Duration,
    ) -> Result<bool, AdapterError> {
        if !self.state.active || self.state.paused || self.state.complete {
            return Ok(self.state.complete);
        }
        let next = (self.state.current_kg + self.rate_kgs * dt.as_secs_f64()).min(self.state.target_kg);
        adapter.write_var(variables::FUEL_TOTAL_KG, next).await?;
        self.state.current_kg = next;
        Ok(next >= self.state.target_kg)
    }

    /// Ends refueling. The aircraft is topped up to the target in case the
    /// truck finished before the fill model did.
    pub async fn stop_refueling(&mut self, adapter: &dyn AutomationAdapter) -> Result<(), AdapterError> {
        if self.state.complete {
            return Ok(());
        }
        self.state.complete = true;
        self.state.active = false;
        self.state.paused = false;
        svc!("Refueling complete at {:.0}kg.", self.state.current_kg);
        if self.state.current_kg < self.state.target_kg {
            adapter.write_var(variables::FUEL_TOTAL_KG, self.state.target_kg).await?;
            self.state.current_kg = self.state.target_kg;
        }
        Ok(())
    }

    /// Refueling is handled outside of the engine for this session.
    pub fn skip(&mut self) {
        if !self.state.complete {
            self.state.complete = true;
            log!("Automatic refueling disabled, treating refueling as complete.");
        }
    }

    pub fn reset(&mut self) { self.state = RefuelingState::default(); }
}
