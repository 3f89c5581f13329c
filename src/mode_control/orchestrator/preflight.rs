use super::{TurnaroundError, TurnaroundOrchestrator};
use crate::event;
use crate::flight_control::FlightPhase;
use crate::mode_control::turnaround_session::SessionLatch;
use crate::service_control::MenuCommand;
use tokio::time::Instant;

impl TurnaroundOrchestrator {
    /// Prepares the gate and waits for a flight plan.
    pub(super) async fn preflight(&mut self) -> Result<(), TurnaroundError> {
        let now = Instant::now();
        if !self.menu.is_idle() {
            return Ok(());
        }
        if self.k.conf().reposition_on_start && !self.session.is_set(SessionLatch::Positioned) {
            self.menu.submit(MenuCommand::Reposition, now)?;
            self.session.set(SessionLatch::Positioned);
            return Ok(());
        }
        if self.gate_setup(now).await? {
            return Ok(());
        }
        let Some(plan) = self.k.plans().current_plan().await? else {
            event!("No flight plan loaded yet.");
            return Ok(());
        };
        self.apply_plan_targets(&plan).await?;
        self.session.load_plan(plan);
        self.fsm.transition(FlightPhase::Departure)?;
        Ok(())
    }
}
