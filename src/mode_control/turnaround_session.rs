use crate::flight_control::FlightPlan;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// One-way flags preventing a side effect from repeating within a session.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum SessionLatch {
    Positioned,
    ConnectCalled,
    PcaCalled,
    InitialFuelSet,
    InitialFluidsSet,
    EquipmentRemoved,
}

/// Per-flight state owned by the orchestrator: the flight plan, the latch
/// map and the tick-counted delays.
#[derive(Debug)]
pub struct TurnaroundSession {
    plan: Option<FlightPlan>,
    latches: HashMap<SessionLatch, bool>,
    boarding_delay_ticks: u32,
    loadsheet_delay_ticks: u32,
    loadsheet_delay_target: Option<u32>,
}

impl Default for TurnaroundSession {
    fn default() -> Self { Self::new() }
}

impl TurnaroundSession {
    /// Ticks to wait after refueling before boarding is requested.
    pub const BOARDING_DELAY_TICKS: u32 = 90;
    /// Range the final loadsheet delay is drawn from, in ticks.
    pub const LOADSHEET_DELAY_TICKS: std::ops::Range<u32> = 90..150;

    pub fn new() -> Self {
        Self {
            plan: None,
            latches: SessionLatch::iter().map(|l| (l, false)).collect(),
            boarding_delay_ticks: 0,
            loadsheet_delay_ticks: 0,
            loadsheet_delay_target: None,
        }
    }

    pub fn plan(&self) -> Option<&FlightPlan> { self.plan.as_ref() }
    pub fn flight_id(&self) -> Option<&str> { self.plan.as_ref().map(FlightPlan::id) }
    pub fn callsign(&self) -> Option<&str> { self.plan.as_ref().map(FlightPlan::callsign) }
    pub fn load_plan(&mut self, plan: FlightPlan) { self.plan = Some(plan); }

    pub fn is_set(&self, latch: SessionLatch) -> bool { self.latches.get(&latch).copied().unwrap_or(false) }
    pub fn set(&mut self, latch: SessionLatch) { self.latches.insert(latch, true); }
    pub fn clear(&mut self, latch: SessionLatch) { self.latches.insert(latch, false); }
    #[cfg(test)]
    pub fn any_latch_set(&self) -> bool { self.latches.values().any(|v| *v) }

    /// Counts one tick of the boarding settle delay; true once it elapsed.
    pub fn tick_boarding_delay(&mut self) -> bool {
        if self.boarding_delay_ticks < Self::BOARDING_DELAY_TICKS {
            self.boarding_delay_ticks += 1;
        }
        self.boarding_delay_ticks >= Self::BOARDING_DELAY_TICKS
    }

    pub fn boarding_delay_ticks(&self) -> u32 { self.boarding_delay_ticks }

    /// Counts one tick of the final loadsheet delay, drawing the random
    /// target on first use. True once it elapsed.
    pub fn tick_loadsheet_delay<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let target = *self
            .loadsheet_delay_target
            .get_or_insert_with(|| rng.random_range(Self::LOADSHEET_DELAY_TICKS));
        if self.loadsheet_delay_ticks < target {
            self.loadsheet_delay_ticks += 1;
        }
        self.loadsheet_delay_ticks >= target
    }

    #[cfg(test)]
    pub fn loadsheet_delay_target(&self) -> Option<u32> { self.loadsheet_delay_target }
    pub fn loadsheet_delay_ticks(&self) -> u32 { self.loadsheet_delay_ticks }

    pub fn reset_delays(&mut self) {
        self.boarding_delay_ticks = 0;
        self.loadsheet_delay_ticks = 0;
        self.loadsheet_delay_target = None;
    }

    /// Full re-arm for a new flight: every latch and counter is cleared.
    pub fn rearm(&mut self, plan: FlightPlan) {
        *self = Self::new();
        self.plan = Some(plan);
    }
}
