use super::{
    automation::{AdapterError, AutomationAdapter},
    menu_channel::{MenuCommand, MenuCommandChannel, MenuError},
    service_state::ServiceState,
    variables,
};
use crate::svc;
use tokio::time::Instant;

/// Progress of either boarding or deboarding.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BoardingState {
    pub requested: bool,
    pub active: bool,
    pub complete: bool,
    /// Passengers boarded (or deboarded) so far.
    pub current: u32,
    pub planned: u32,
    pub cargo_percent: f64,
}

impl BoardingState {
    fn target_reached(&self) -> bool { self.current >= self.planned && self.cargo_percent >= 100.0 }

    /// Activation follows the automation's code only.
    fn observe(&mut self, state: ServiceState) -> bool {
        if self.complete || self.active || !state.is_at_least_requested() {
            return false;
        }
        self.requested = true;
        self.active = true;
        true
    }
}

#[derive(Debug, Default)]
pub struct BoardingCoordinator {
    boarding: BoardingState,
    deboarding: BoardingState,
}

impl BoardingCoordinator {
    pub fn new() -> Self { Self::default() }

    pub fn boarding(&self) -> &BoardingState { &self.boarding }
    pub fn deboarding(&self) -> &BoardingState { &self.deboarding }

    /// Publishes the planned passenger count to the aircraft and the automation.
    pub async fn set_passengers(&mut self, adapter: &dyn AutomationAdapter, n: u32) -> Result<(), AdapterError> {
        adapter.write_var(variables::PAX_PLANNED, f64::from(n)).await?;
        adapter.write_var(variables::GSX_PASSENGERS, f64::from(n)).await?;
        self.boarding.planned = n;
        self.deboarding.planned = n;
        Ok(())
    }

    pub fn request_boarding_service(&mut self, menu: &mut MenuCommandChannel, now: Instant) -> Result<(), MenuError> {
        if self.boarding.requested {
            return Ok(());
        }
        menu.submit(MenuCommand::RequestBoarding, now)?;
        self.boarding.requested = true;
        svc!("Boarding requested for {} passengers.", self.boarding.planned);
        Ok(())
    }

    pub fn on_boarding_request_failed(&mut self) {
        if !self.boarding.active {
            self.boarding.requested = false;
        }
    }

    /// Feeds the automation's boarding code, returns true when this made
    /// boarding active.
    pub fn update_boarding_state(&mut self, state: ServiceState) -> bool {
        let activated = self.boarding.observe(state);
        if activated {
            svc!("Boarding active.");
        }
        activated
    }

    /// Mirrors boarding progress into the aircraft. True once passengers and
    /// cargo both reached their targets.
    pub async fn process_boarding(
        &mut self,
        adapter: &dyn AutomationAdapter,
        current: u32,
        cargo_percent: f64,
    ) -> Result<bool, AdapterError> {
        let onboard = current.min(self.boarding.planned);
        adapter.write_var(variables::PAX_CURRENT, f64::from(onboard)).await?;
        self.boarding.current = onboard;
        self.boarding.cargo_percent = cargo_percent.clamp(0.0, 100.0);
        Ok(self.boarding.target_reached())
    }

    pub fn stop_boarding(&mut self) {
        if !self.boarding.complete {
            self.boarding.active = false;
            self.boarding.complete = true;
            svc!("Boarding complete, {} passengers on board.", self.boarding.current);
        }
    }

    pub fn request_deboarding_service(&mut self, menu: &mut MenuCommandChannel, now: Instant) -> Result<(), MenuError> {
        if self.deboarding.requested {
            return Ok(());
        }
        menu.submit(MenuCommand::RequestDeboarding, now)?;
        self.deboarding.requested = true;
        svc!("Deboarding requested for {} passengers.", self.deboarding.planned);
        Ok(())
    }

    pub fn on_deboarding_request_failed(&mut self) {
        if !self.deboarding.active {
            self.deboarding.requested = false;
        }
    }

    pub fn update_deboarding_state(&mut self, state: ServiceState) -> bool {
        let activated = self.deboarding.observe(state);
        if activated {
            svc!("Deboarding active.");
        }
        activated
    }

    /// `current` counts passengers that already left the aircraft.
    pub async fn process_deboarding(
        &mut self,
        adapter: &dyn AutomationAdapter,
        current: u32,
        cargo_percent: f64,
    ) -> Result<bool, AdapterError> {
        let left = current.min(self.deboarding.planned);
        adapter.write_var(variables::PAX_CURRENT, f64::from(self.deboarding.planned - left)).await?;
        self.deboarding.current = left;
        self.deboarding.cargo_percent = cargo_percent.clamp(0.0, 100.0);
        Ok(self.deboarding.target_reached())
    }

    pub fn stop_deboarding(&mut self) {
        if !self.deboarding.complete {
            self.deboarding.active = false;
            self.deboarding.complete = true;
            svc!("Deboarding complete.");
        }
    }

    /// Keeps the planned passenger count, clears all progress.
    pub fn reset(&mut self) {
        let planned = self.boarding.planned;
        self.boarding = BoardingState { planned, ..BoardingState::default() };
        self.deboarding = BoardingState { planned, ..BoardingState::default() };
    }
}
