//! In-memory stand-ins for every external collaborator, shared by the unit tests.

use crate::config::TurnaroundConfig;
use crate::flight_control::{FlightPlan, FlightPlanSource, TelemetryError, TelemetrySource};
use crate::keychain::Keychain;
use crate::service_control::{
    AdapterError, AutomationAdapter, GroundService, LoadsheetError, LoadsheetKind, LoadsheetResponse,
    LoadsheetServer, ServiceState, variables,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

#[derive(Debug, Clone)]
struct TelemetryValues {
    on_ground: bool,
    n2: Vec<f64>,
    parking_brake: bool,
    beacon: bool,
    ext_power: bool,
    ground_speed: f64,
    failing: bool,
}

/// Aircraft parked cold and dark unless told otherwise.
#[derive(Debug)]
pub struct FakeTelemetry {
    values: Mutex<TelemetryValues>,
}

impl FakeTelemetry {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(TelemetryValues {
                on_ground: true,
                n2: vec![0.0, 0.0],
                parking_brake: true,
                beacon: false,
                ext_power: true,
                ground_speed: 0.0,
                failing: false,
            }),
        }
    }

    fn with<F: FnOnce(&mut TelemetryValues)>(&self, f: F) { f(&mut self.values.lock().unwrap()); }

    pub fn set_on_ground(&self, v: bool) { self.with(|t| t.on_ground = v); }
    pub fn set_engines_running(&self, v: bool) {
        self.with(|t| t.n2 = if v { vec![62.0, 61.5] } else { vec![0.0, 0.0] });
    }
    pub fn set_beacon(&self, v: bool) { self.with(|t| t.beacon = v); }
    pub fn set_ext_power(&self, v: bool) { self.with(|t| t.ext_power = v); }
    pub fn set_ground_speed(&self, v: f64) { self.with(|t| t.ground_speed = v); }
    /// Every read fails while set.
    pub fn set_failing(&self, v: bool) { self.with(|t| t.failing = v); }

    fn read<T, F: FnOnce(&TelemetryValues) -> T>(&self, f: F) -> Result<T, TelemetryError> {
        let values = self.values.lock().unwrap();
        if values.failing {
            return Err(TelemetryError::NoConnection);
        }
        Ok(f(&values))
    }
}

#[async_trait]
impl TelemetrySource for FakeTelemetry {
    async fn on_ground(&self) -> Result<bool, TelemetryError> { self.read(|t| t.on_ground) }
    async fn engine_samples(&self) -> Result<Vec<f64>, TelemetryError> { self.read(|t| t.n2.clone()) }
    async fn parking_brake_set(&self) -> Result<bool, TelemetryError> { self.read(|t| t.parking_brake) }
    async fn beacon_on(&self) -> Result<bool, TelemetryError> { self.read(|t| t.beacon) }
    async fn external_power_available(&self) -> Result<bool, TelemetryError> { self.read(|t| t.ext_power) }
    async fn ground_speed(&self) -> Result<f64, TelemetryError> { self.read(|t| t.ground_speed) }
}

/// Variable store of the automation. Unknown variables read as `0.0`, the
/// menu is always ready.
#[derive(Debug)]
pub struct FakeAutomation {
    vars: Mutex<HashMap<String, f64>>,
    writes: Mutex<Vec<(String, f64)>>,
    failing_writes: Mutex<bool>,
    panic_on_read: Mutex<Option<String>>,
}

impl FakeAutomation {
    pub fn new() -> Self {
        let automation = Self {
            vars: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            failing_writes: Mutex::new(false),
            panic_on_read: Mutex::new(None),
        };
        automation.set(variables::MENU_READY, 1.0);
        automation
    }

    pub fn set(&self, name: &str, value: f64) { self.vars.lock().unwrap().insert(name.to_string(), value); }

    pub fn get(&self, name: &str) -> f64 { self.vars.lock().unwrap().get(name).copied().unwrap_or(0.0) }

    pub fn set_state(&self, service: GroundService, state: ServiceState) {
        self.set(service.state_var(), f64::from(state));
    }

    pub fn write_count(&self) -> usize { self.writes.lock().unwrap().len() }

    pub fn writes_to(&self, name: &str) -> usize {
        self.writes.lock().unwrap().iter().filter(|(n, _)| n == name).count()
    }

    /// Number of times the menu entry `index` (1-based) was selected.
    #[allow(clippy::cast_precision_loss)]
    pub fn selections_of(&self, index: u8) -> usize {
        let choice = f64::from(index - 1);
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, v)| n == variables::MENU_CHOICE && (*v - choice).abs() < f64::EPSILON)
            .count()
    }

    pub fn set_failing_writes(&self, v: bool) { *self.failing_writes.lock().unwrap() = v; }

    pub fn set_panic_on_read(&self, name: Option<&str>) {
        *self.panic_on_read.lock().unwrap() = name.map(str::to_string);
    }
}

#[async_trait]
impl AutomationAdapter for FakeAutomation {
    async fn read_var(&self, name: &str) -> Result<f64, AdapterError> {
        let panics = self.panic_on_read.lock().unwrap().as_deref() == Some(name);
        assert!(!panics, "read of {name} blew up");
        Ok(self.get(name))
    }

    async fn write_var(&self, name: &str, value: f64) -> Result<(), AdapterError> {
        if *self.failing_writes.lock().unwrap() {
            return Err(AdapterError::NoConnection);
        }
        self.writes.lock().unwrap().push((name.to_string(), value));
        self.set(name, value);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakePlans {
    plan: Mutex<Option<FlightPlan>>,
}

impl FakePlans {
    pub fn set_plan(&self, plan: Option<FlightPlan>) { *self.plan.lock().unwrap() = plan; }
}

#[async_trait]
impl FlightPlanSource for FakePlans {
    async fn current_plan(&self) -> Result<Option<FlightPlan>, AdapterError> {
        Ok(self.plan.lock().unwrap().clone())
    }
}

/// Loadsheet server answering immediately with a configurable outcome.
#[derive(Debug)]
pub struct FakeLoadsheetServer {
    available: Mutex<bool>,
    outcome: Mutex<Result<LoadsheetResponse, LoadsheetError>>,
    status_checks: AtomicUsize,
    generated: Mutex<Vec<(LoadsheetKind, String)>>,
}

impl FakeLoadsheetServer {
    pub fn new() -> Self {
        Self {
            available: Mutex::new(true),
            outcome: Mutex::new(Ok(LoadsheetResponse::new(true, None, Some("LOADSHEET")))),
            status_checks: AtomicUsize::new(0),
            generated: Mutex::new(Vec::new()),
        }
    }

    pub fn set_available(&self, v: bool) { *self.available.lock().unwrap() = v; }

    pub fn set_outcome(&self, outcome: Result<LoadsheetResponse, LoadsheetError>) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn status_checks(&self) -> usize { self.status_checks.load(Ordering::SeqCst) }

    pub fn generated(&self, kind: LoadsheetKind) -> usize {
        self.generated.lock().unwrap().iter().filter(|(k, _)| *k == kind).count()
    }
}

#[async_trait]
impl LoadsheetServer for FakeLoadsheetServer {
    async fn is_available(&self) -> Result<bool, LoadsheetError> {
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        Ok(*self.available.lock().unwrap())
    }

    async fn generate(&self, kind: LoadsheetKind, flight_id: &str) -> Result<LoadsheetResponse, LoadsheetError> {
        self.generated.lock().unwrap().push((kind, flight_id.to_string()));
        self.outcome.lock().unwrap().clone()
    }
}

/// Every fake wired into one keychain.
pub struct MockSetup {
    pub telemetry: Arc<FakeTelemetry>,
    pub automation: Arc<FakeAutomation>,
    pub plans: Arc<FakePlans>,
    pub loadsheet: Arc<FakeLoadsheetServer>,
}

impl MockSetup {
    pub fn new() -> Self {
        Self {
            telemetry: Arc::new(FakeTelemetry::new()),
            automation: Arc::new(FakeAutomation::new()),
            plans: Arc::new(FakePlans::default()),
            loadsheet: Arc::new(FakeLoadsheetServer::new()),
        }
    }

    pub fn keychain(&self, conf: TurnaroundConfig) -> Keychain {
        Keychain::new(
            self.telemetry.clone(),
            self.automation.clone(),
            self.plans.clone(),
            self.loadsheet.clone(),
            conf,
        )
    }
}

/// Default configuration without the repositioning menu sequence.
pub fn test_config() -> TurnaroundConfig {
    TurnaroundConfig { reposition_on_start: false, ..TurnaroundConfig::default() }
}

pub fn test_plan(id: &str) -> FlightPlan { FlightPlan::new(id, "DLH4TK", 7400.0, 162, 2100.0) }
