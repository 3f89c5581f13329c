use super::{TurnaroundError, TurnaroundOrchestrator, pax_count, plan_targets_applied};
use crate::flight_control::FlightPhase;
use crate::mode_control::turnaround_session::SessionLatch;
use crate::service_control::{GroundService, LoadsheetKind, RemovalOutcome, ServiceState, variables};
use crate::{event, log};
use tokio::time::Instant;

impl TurnaroundOrchestrator {
    /// Refuel, cater, board, finalize the loadsheet and clear the gate.
    pub(super) async fn departure(&mut self) -> Result<(), TurnaroundError> {
        let now = Instant::now();
        let adapter = self.k.automation();
        let hose = adapter.fuel_hose_connected().await?;
        let refuel_state = adapter.service_state(GroundService::Refuel).await?;

        self.preliminary_loadsheet(hose);
        if self.refuel_step(hose, refuel_state, now).await? {
            return Ok(());
        }
        if self.catering_step(now).await? {
            return Ok(());
        }
        if self.boarding_step(now).await? {
            return Ok(());
        }
        if self.final_loadsheet_step().await? {
            return Ok(());
        }
        if self.equipment_removal_step(now).await? {
            return Ok(());
        }
        self.fsm.transition(FlightPhase::TaxiOut)?;
        self.session.reset_delays();
        Ok(())
    }

    fn preliminary_loadsheet(&mut self, hose: bool) {
        if self.loadsheet.record(LoadsheetKind::Preliminary).is_requested() {
            return;
        }
        let Some(plan) = self.session.plan() else { return };
        let ready = hose
            && plan_targets_applied(plan, &self.refuel, &self.cargo, &self.boarding)
            && self.refuel.is_active()
            && !self.refuel.is_complete();
        if ready {
            self.loadsheet.request_generation(LoadsheetKind::Preliminary, self.k.loadsheet(), plan.id());
        }
    }

    /// Returns true if the rest of the handler has to wait for this tick.
    async fn refuel_step(&mut self, hose: bool, state: ServiceState, now: Instant) -> Result<bool, TurnaroundError> {
        if !self.k.conf().auto_refuel {
            self.refuel.skip();
            return Ok(false);
        }
        if self.refuel.is_complete() {
            return Ok(false);
        }
        let adapter = self.k.automation();
        if state.is_completed() {
            self.refuel.stop_refueling(adapter).await?;
            return Ok(true);
        }
        if !self.session.is_set(SessionLatch::InitialFuelSet) {
            self.refuel.set_initial_fuel(adapter).await?;
            self.session.set(SessionLatch::InitialFuelSet);
            return Ok(true);
        }
        if !self.session.is_set(SessionLatch::InitialFluidsSet) {
            self.refuel.set_hydraulic_fluid_levels(adapter).await?;
            self.session.set(SessionLatch::InitialFluidsSet);
            return Ok(true);
        }
        if !self.refuel.is_requested() {
            if self.menu.is_idle() {
                self.refuel.request_refueling(&mut self.menu, now)?;
            }
            return Ok(true);
        }
        if state.is_active() {
            self.refuel.set_active();
        }
        if !self.refuel.is_active() {
            return Ok(false);
        }
        if !hose {
            self.refuel.pause();
            return Ok(false);
        }
        self.refuel.resume();
        if self.refuel.process_refueling(adapter, self.fsm.poll_interval()).await? {
            self.refuel.stop_refueling(adapter).await?;
        }
        Ok(false)
    }

    async fn catering_step(&mut self, now: Instant) -> Result<bool, TurnaroundError> {
        if !self.k.conf().call_catering {
            self.catering.skip();
            return Ok(false);
        }
        if self.catering.is_complete() {
            return Ok(false);
        }
        if !self.catering.is_requested() {
            if self.menu.is_idle() {
                self.catering.request_catering_service(&mut self.menu, now)?;
            }
            return Ok(true);
        }
        let adapter = self.k.automation();
        let state = adapter.service_state(GroundService::Catering).await?;
        self.catering.update(adapter, state).await?;
        Ok(false)
    }

    async fn boarding_step(&mut self, now: Instant) -> Result<bool, TurnaroundError> {
        if self.boarding.boarding().complete || !self.refuel.is_complete() {
            return Ok(false);
        }
        let adapter = self.k.automation();
        let state = adapter.service_state(GroundService::Boarding).await?;
        self.boarding.update_boarding_state(state);
        if !self.boarding.boarding().requested {
            if !self.session.tick_boarding_delay() {
                return Ok(true);
            }
            if self.k.conf().auto_boarding && self.menu.is_idle() {
                self.boarding.request_boarding_service(&mut self.menu, now)?;
                event!("Boarding requested after {} ticks.", self.session.boarding_delay_ticks());
            }
            return Ok(true);
        }
        if !self.boarding.boarding().active {
            return Ok(false);
        }
        let pax = pax_count(adapter.read_var(variables::BOARDING_PAX).await?);
        let cargo_percent = adapter.read_var(variables::BOARDING_CARGO_PERCENT).await?;
        self.cargo.update_loading(adapter, cargo_percent).await?;
        let done = self.boarding.process_boarding(adapter, pax, cargo_percent).await?;
        if done || state.is_completed() {
            self.boarding.stop_boarding();
        }
        Ok(false)
    }

    /// Waits a random number of ticks once all services are done and then
    /// requests the final loadsheet. Returns true while departure has to wait.
    async fn final_loadsheet_step(&mut self) -> Result<bool, TurnaroundError> {
        let services_done =
            self.refuel.is_complete() && self.boarding.boarding().complete && self.catering.is_complete();
        if !services_done {
            return Ok(true);
        }
        if self.loadsheet.record(LoadsheetKind::Final).is_requested() {
            return Ok(false);
        }
        if !self.session.tick_loadsheet_delay(&mut rand::rng()) {
            return Ok(true);
        }
        let Some(plan) = self.session.plan().cloned() else { return Ok(true) };
        if !plan_targets_applied(&plan, &self.refuel, &self.cargo, &self.boarding) {
            log!("Aircraft targets differ from flight plan {}, publishing them again.", plan.id());
            self.apply_plan_targets(&plan).await?;
            return Ok(true);
        }
        self.loadsheet.request_generation(LoadsheetKind::Final, self.k.loadsheet(), plan.id());
        log!("Final loadsheet requested after {} ticks.", self.session.loadsheet_delay_ticks());
        Ok(true)
    }

    /// Removes jetway and stairs and disconnects the ground equipment once
    /// the crew prepares for pushback.
    async fn equipment_removal_step(&mut self, now: Instant) -> Result<bool, TurnaroundError> {
        if self.session.is_set(SessionLatch::EquipmentRemoved) {
            return Ok(false);
        }
        if !self.loadsheet.record(LoadsheetKind::Final).is_settled() {
            return Ok(true);
        }
        let snap = self.snapshot;
        if !snap.parking_brake() || !snap.beacon() || snap.ext_power_available() {
            event!("Waiting for parking brake, beacon and external power off.");
            return Ok(true);
        }
        if !self.menu.is_idle() {
            return Ok(true);
        }
        let adapter = self.k.automation();
        match self.equipment.remove_jetway_stairs(adapter, &mut self.menu, now).await? {
            RemovalOutcome::Issued(_) | RemovalOutcome::Skipped => return Ok(true),
            RemovalOutcome::Clear => {}
        }
        self.equipment.disconnect_all_ground_services(adapter).await?;
        self.session.set(SessionLatch::EquipmentRemoved);
        log!("Ground equipment removed, ready for pushback.");
        Ok(true)
    }
}
