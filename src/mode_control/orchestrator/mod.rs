mod arrival;
mod departure;
mod preflight;
mod turnaround;

use super::{
    status_hub::{ServiceStatusEvent, StatusHub},
    turnaround_session::{SessionLatch, TurnaroundSession},
};
use crate::flight_control::{FlightPhase, FlightPlan, FlightStateMachine, TelemetrySnapshot, TransitionError};
use crate::keychain::Keychain;
use crate::service_control::{
    AdapterError, BoardingCoordinator, CargoCoordinator, CateringCoordinator, EquipmentCoordinator,
    GroundService, LoadsheetCoordinator, LoadsheetKind, MenuCommand, MenuCommandChannel, MenuError,
    MenuProgress, RefuelingCoordinator, ServiceError, ServiceState, VariableChange, VariableWatch,
};
use crate::{error, event, info, log, warn};
use futures::FutureExt;
use std::{panic::AssertUnwindSafe, sync::Arc};
use strum::IntoEnumIterator;
use strum_macros::Display;
use tokio::{sync::mpsc, time::Instant};
use tokio_util::sync::CancellationToken;

/// Error raised by a phase handler during one tick. Never ends the loop.
#[derive(Debug, Display)]
pub enum TurnaroundError {
    #[strum(to_string = "automation: {err}")]
    Adapter { err: AdapterError },
    #[strum(to_string = "service: {err}")]
    Service { err: ServiceError },
    #[strum(to_string = "menu: {err}")]
    Menu { err: MenuError },
    #[strum(to_string = "{err}")]
    Transition { err: TransitionError },
}

impl std::error::Error for TurnaroundError {}

impl From<AdapterError> for TurnaroundError {
    fn from(err: AdapterError) -> Self { TurnaroundError::Adapter { err } }
}

impl From<ServiceError> for TurnaroundError {
    fn from(err: ServiceError) -> Self { TurnaroundError::Service { err } }
}

impl From<MenuError> for TurnaroundError {
    fn from(err: MenuError) -> Self { TurnaroundError::Menu { err } }
}

impl From<TransitionError> for TurnaroundError {
    fn from(err: TransitionError) -> Self { TurnaroundError::Transition { err } }
}

/// The control loop of the engine.
///
/// Owns every piece of session state and mutates it only from within
/// [`tick`](Self::tick). One tick refreshes the telemetry snapshot, resumes
/// the menu channel, collects finished loadsheets and service changes,
/// evaluates the fast phase transitions and then runs the handler of the
/// current phase. Handlers are lists of guarded steps that perform at most
/// one side effect and return.
pub struct TurnaroundOrchestrator {
    k: Keychain,
    hub: Arc<StatusHub>,
    fsm: FlightStateMachine,
    session: TurnaroundSession,
    snapshot: TelemetrySnapshot,
    menu: MenuCommandChannel,
    refuel: RefuelingCoordinator,
    boarding: BoardingCoordinator,
    catering: CateringCoordinator,
    cargo: CargoCoordinator,
    equipment: EquipmentCoordinator,
    loadsheet: LoadsheetCoordinator,
    watch: VariableWatch,
    retrigger_tx: mpsc::UnboundedSender<LoadsheetKind>,
    retrigger_rx: mpsc::UnboundedReceiver<LoadsheetKind>,
    ticks: u64,
}

impl TurnaroundOrchestrator {
    pub fn new(k: Keychain) -> Self {
        let hub = k.hub();
        let refuel = RefuelingCoordinator::new(k.conf().refuel_rate_kgs, k.conf().hydraulic_level);
        let state_vars: Vec<&'static str> = GroundService::iter().map(GroundService::state_var).collect();
        let mut watch = VariableWatch::new(&state_vars);
        let service_hub = Arc::clone(&hub);
        watch.subscribe(Box::new(move |change: &VariableChange| {
            let Some(service) = GroundService::from_state_var(change.var) else { return };
            match ServiceState::try_from(change.new) {
                Ok(state) => service_hub.publish_service(ServiceStatusEvent { service, state }),
                Err(e) => event!("Ignoring {service} change: {e}"),
            }
        }));
        let (retrigger_tx, retrigger_rx) = mpsc::unbounded_channel();
        Self {
            k,
            hub,
            fsm: FlightStateMachine::new(),
            session: TurnaroundSession::new(),
            snapshot: TelemetrySnapshot::default(),
            menu: MenuCommandChannel::new(),
            refuel,
            boarding: BoardingCoordinator::new(),
            catering: CateringCoordinator::new(),
            cargo: CargoCoordinator::new(),
            equipment: EquipmentCoordinator::new(),
            loadsheet: LoadsheetCoordinator::new(),
            watch,
            retrigger_tx,
            retrigger_rx,
            ticks: 0,
        }
    }

    pub fn phase(&self) -> FlightPhase { self.fsm.current() }
    pub fn ticks(&self) -> u64 { self.ticks }

    /// Sender for loadsheet re-trigger requests, drained at the start of
    /// every tick.
    pub fn retrigger_handle(&self) -> mpsc::UnboundedSender<LoadsheetKind> { self.retrigger_tx.clone() }

    /// Clears the latch of a failed loadsheet flow so the handler requests
    /// it again. Returns false if the flow did not fail.
    pub fn retrigger_loadsheet(&mut self, kind: LoadsheetKind) -> bool {
        let cleared = self.loadsheet.retrigger(kind);
        if cleared {
            log!("{kind} loadsheet re-triggered.");
        }
        cleared
    }

    /// Runs ticks at the interval of the current phase until `c_tok` is
    /// cancelled. Between two ticks the menu channel is resumed whenever its
    /// running command becomes due.
    pub async fn run(&mut self, c_tok: CancellationToken) {
        info!("Turnaround engine started in {}.", self.fsm.current());
        loop {
            self.tick().await;
            let next_tick = Instant::now() + self.fsm.poll_interval();
            loop {
                let wake = self.menu.resume_at().map_or(next_tick, |at| at.min(next_tick));
                tokio::select! {
                    () = c_tok.cancelled() => {
                        info!("Shutdown requested in {}, leaving control loop.", self.fsm.current());
                        return;
                    }
                    () = tokio::time::sleep_until(wake) => {}
                }
                if wake >= next_tick {
                    break;
                }
                self.resume_menu(Instant::now()).await;
            }
        }
    }

    /// Executes one iteration of the control loop.
    pub async fn tick(&mut self) {
        self.ticks += 1;
        self.snapshot.refresh(self.k.telemetry()).await;
        self.resume_menu(Instant::now()).await;
        self.loadsheet.poll();
        while let Ok(kind) = self.retrigger_rx.try_recv() {
            if !self.retrigger_loadsheet(kind) {
                warn!("{kind} loadsheet has not failed, nothing to re-trigger.");
            }
        }
        self.watch.poll(self.k.automation()).await;

        let phase = self.fsm.current();
        match AssertUnwindSafe(self.dispatch()).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("{phase} handler failed: {e}"),
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| String::from("unknown panic"));
                error!("{phase} handler panicked: {msg}");
            }
        }
        self.hub.publish_phase(self.fsm.current());
        self.hub.publish_status(&self.status_line());
    }

    /// Advances the in-flight menu command and routes a failure back to the
    /// coordinator that issued it.
    pub(crate) async fn resume_menu(&mut self, now: Instant) {
        if let MenuProgress::Failed(command, _) = self.menu.advance(self.k.automation(), now).await {
            self.on_menu_failure(command);
        }
    }

    fn on_menu_failure(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::Reposition => self.session.clear(SessionLatch::Positioned),
            MenuCommand::RequestRefuel => self.refuel.on_request_failed(),
            MenuCommand::RequestCatering => self.catering.on_request_failed(),
            MenuCommand::RequestBoarding => self.boarding.on_boarding_request_failed(),
            MenuCommand::RequestDeboarding => self.boarding.on_deboarding_request_failed(),
            MenuCommand::ToggleJetway | MenuCommand::ToggleStairs => {
                if self.equipment.on_toggle_failed(command) {
                    self.session.clear(SessionLatch::ConnectCalled);
                }
            }
        }
    }

    async fn dispatch(&mut self) -> Result<(), TurnaroundError> {
        if self.fast_transition().await? {
            return Ok(());
        }
        match self.fsm.current() {
            FlightPhase::Preflight => self.preflight().await,
            FlightPhase::Departure => self.departure().await,
            FlightPhase::TaxiOut | FlightPhase::Flight => Ok(()),
            FlightPhase::TaxiIn => self.taxi_in(),
            FlightPhase::Arrival => self.arrival().await,
            FlightPhase::Turnaround => self.turnaround().await,
        }
    }

    /// Transitions that only depend on the telemetry snapshot.
    async fn fast_transition(&mut self) -> Result<bool, TurnaroundError> {
        let snap = self.snapshot;
        match self.fsm.current() {
            FlightPhase::Preflight if !snap.on_ground() || snap.engines_running() => {
                // A failed disconnect keeps the phase, the next tick retries.
                if snap.on_ground() {
                    self.equipment.disconnect_all_ground_services(self.k.automation()).await?;
                }
                log!("Aircraft not cold and dark at startup, assuming in-flight start.");
                self.fsm.override_in_flight_start()?;
                Ok(true)
            }
            FlightPhase::TaxiOut if !snap.on_ground() => {
                self.fsm.transition(FlightPhase::Flight)?;
                Ok(true)
            }
            FlightPhase::Flight if snap.on_ground() => {
                if self.fsm.was_in_flight_start() {
                    log!("Landed after an in-flight start, no departure data for this leg.");
                }
                self.fsm.transition(FlightPhase::TaxiIn)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn taxi_in(&mut self) -> Result<(), TurnaroundError> {
        if !self.snapshot.is_parked() {
            return Ok(());
        }
        self.fsm.transition(FlightPhase::Arrival)?;
        self.equipment.reset();
        self.session.clear(SessionLatch::ConnectCalled);
        self.session.clear(SessionLatch::PcaCalled);
        Ok(())
    }

    /// Calls jetway/stairs, then GPU and chocks, then PCA. Returns whether a
    /// command was issued this tick. The menu must be idle.
    async fn gate_setup(&mut self, now: Instant) -> Result<bool, TurnaroundError> {
        let adapter = self.k.automation();
        if !self.session.is_set(SessionLatch::ConnectCalled) {
            let jetway_only = self.k.conf().jetway_only;
            if let Some(command) =
                self.equipment.call_jetway_stairs(adapter, &mut self.menu, now, jetway_only).await?
            {
                event!("Gate setup issued {command}.");
                return Ok(true);
            }
            self.equipment.connect_gpu(adapter).await?;
            self.equipment.set_chocks(adapter, true).await?;
            self.session.set(SessionLatch::ConnectCalled);
            return Ok(true);
        }
        if self.k.conf().connect_pca && !self.session.is_set(SessionLatch::PcaCalled) {
            self.equipment.connect_pca(adapter).await?;
            self.session.set(SessionLatch::PcaCalled);
            return Ok(true);
        }
        Ok(false)
    }

    /// Publishes the plan's fuel, cargo and passenger targets.
    async fn apply_plan_targets(&mut self, plan: &FlightPlan) -> Result<(), TurnaroundError> {
        let adapter = self.k.automation();
        self.refuel.set_target(adapter, plan.fuel_planned_kg()).await?;
        self.cargo.set_target(adapter, plan.cargo_kg()).await?;
        self.boarding.set_passengers(adapter, plan.passengers()).await?;
        info!(
            "Flight plan {} ({}) loaded: {:.0}kg fuel, {} passengers, {:.0}kg cargo.",
            plan.id(),
            plan.callsign(),
            plan.fuel_planned_kg(),
            plan.passengers(),
            plan.cargo_kg()
        );
        Ok(())
    }

    fn status_line(&self) -> String {
        let phase = self.fsm.current();
        let callsign = self.session.callsign().unwrap_or("----");
        let line = match phase {
            FlightPhase::Departure => {
                let fuel = self.refuel.state();
                let pax = self.boarding.boarding();
                let paused = if self.refuel.is_paused() { " (paused)" } else { "" };
                format!(
                    "{callsign} {phase}: fuel {:.0}/{:.0}kg{paused}, pax {}/{}, cargo {:.0}%",
                    fuel.current_kg, fuel.target_kg, pax.current, pax.planned, self.cargo.percent()
                )
            }
            FlightPhase::Arrival => {
                let pax = self.boarding.deboarding();
                format!("{callsign} {phase}: deboarded {}/{}", pax.current, pax.planned)
            }
            _ => format!("{callsign} {phase}"),
        };
        match self.menu.running() {
            Some(command) => format!("{line} [menu: {command}]"),
            None => line,
        }
    }
}

#[cfg(test)]
impl TurnaroundOrchestrator {
    pub fn fsm(&self) -> &FlightStateMachine { &self.fsm }
    pub fn poll_interval(&self) -> std::time::Duration { self.fsm.poll_interval() }
    pub fn session(&self) -> &TurnaroundSession { &self.session }
    pub fn menu(&self) -> &MenuCommandChannel { &self.menu }
    pub fn refuel(&self) -> &RefuelingCoordinator { &self.refuel }
    pub fn boarding(&self) -> &BoardingCoordinator { &self.boarding }
    pub fn loadsheet(&self) -> &LoadsheetCoordinator { &self.loadsheet }
}

/// Whether fuel, cargo and passenger targets published to the aircraft
/// match `plan`. Loadsheets are only generated against matching targets.
pub(super) fn plan_targets_applied(
    plan: &FlightPlan,
    refuel: &RefuelingCoordinator,
    cargo: &CargoCoordinator,
    boarding: &BoardingCoordinator,
) -> bool {
    refuel.target_matches(plan.fuel_planned_kg())
        && cargo.has_target()
        && (cargo.planned_kg() - plan.cargo_kg()).abs() < 1.0
        && boarding.boarding().planned == plan.passengers()
}

/// Passenger counters are published as floating point variables.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pax_count(value: f64) -> u32 { value.max(0.0).round() as u32 }
