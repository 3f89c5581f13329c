use super::{TurnaroundError, TurnaroundOrchestrator, pax_count};
use crate::flight_control::FlightPhase;
use crate::service_control::{GroundService, variables};
use tokio::time::Instant;

impl TurnaroundOrchestrator {
    /// Connects the gate and deboards passengers and cargo.
    pub(super) async fn arrival(&mut self) -> Result<(), TurnaroundError> {
        let now = Instant::now();
        if !self.menu.is_idle() {
            return Ok(());
        }
        if self.gate_setup(now).await? {
            return Ok(());
        }
        let adapter = self.k.automation();
        let state = adapter.service_state(GroundService::Deboarding).await?;
        self.boarding.update_deboarding_state(state);
        let (requested, active, complete) = {
            let deboarding = self.boarding.deboarding();
            (deboarding.requested, deboarding.active, deboarding.complete)
        };
        if complete {
            self.fsm.transition(FlightPhase::Turnaround)?;
            return Ok(());
        }
        if !requested {
            if self.k.conf().auto_deboarding {
                self.boarding.request_deboarding_service(&mut self.menu, now)?;
            }
            return Ok(());
        }
        if !active {
            return Ok(());
        }
        let pax = pax_count(adapter.read_var(variables::DEBOARDING_PAX).await?);
        let cargo_percent = adapter.read_var(variables::DEBOARDING_CARGO_PERCENT).await?;
        self.cargo.update_unloading(adapter, cargo_percent).await?;
        let done = self.boarding.process_deboarding(adapter, pax, cargo_percent).await?;
        if done || state.is_completed() {
            self.boarding.stop_deboarding();
        }
        Ok(())
    }
}
