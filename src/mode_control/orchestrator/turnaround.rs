use super::{TurnaroundError, TurnaroundOrchestrator};
use crate::flight_control::{FlightPhase, FlightPlan};
use crate::{event, info};

impl TurnaroundOrchestrator {
    /// Waits for a flight plan with a new id and re-arms the session for it.
    pub(super) async fn turnaround(&mut self) -> Result<(), TurnaroundError> {
        let Some(plan) = self.k.plans().current_plan().await? else {
            return Ok(());
        };
        if self.session.flight_id() == Some(plan.id()) {
            event!("Flight plan {} unchanged, waiting for the next one.", plan.id());
            return Ok(());
        }
        self.rearm(plan).await
    }

    async fn rearm(&mut self, plan: FlightPlan) -> Result<(), TurnaroundError> {
        self.refuel.reset();
        self.boarding.reset();
        self.catering.reset();
        self.cargo.reset();
        self.equipment.reset();
        self.loadsheet.reset();
        self.apply_plan_targets(&plan).await?;
        info!("Re-arming for flight {}.", plan.id());
        self.session.rearm(plan);
        self.fsm.transition(FlightPhase::Departure)?;
        Ok(())
    }
}
