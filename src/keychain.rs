use crate::config::TurnaroundConfig;
use crate::flight_control::{FlightPlanSource, TelemetrySource};
use crate::http_handler::{HttpLoadsheetServer, SimBridge, http_client::HTTPClient};
use crate::mode_control::StatusHub;
use crate::service_control::{AutomationAdapter, LoadsheetServer};
use std::sync::Arc;

/// Struct holding every external collaborator of the engine, constructed
/// once at startup and handed to the orchestrator and its coordinators.
#[derive(Clone)]
pub struct Keychain {
    /// Aircraft telemetry.
    telemetry: Arc<dyn TelemetrySource>,
    /// Ground handling automation and flight-management variables.
    automation: Arc<dyn AutomationAdapter>,
    /// Source of the currently loaded flight plan.
    plans: Arc<dyn FlightPlanSource>,
    /// Remote loadsheet server.
    loadsheet: Arc<dyn LoadsheetServer>,
    /// Runtime configuration.
    conf: Arc<TurnaroundConfig>,
    /// Upward status feed.
    hub: Arc<StatusHub>,
}

impl Keychain {
    pub fn new(
        telemetry: Arc<dyn TelemetrySource>,
        automation: Arc<dyn AutomationAdapter>,
        plans: Arc<dyn FlightPlanSource>,
        loadsheet: Arc<dyn LoadsheetServer>,
        conf: TurnaroundConfig,
    ) -> Self {
        Self {
            telemetry,
            automation,
            plans,
            loadsheet,
            conf: Arc::new(conf),
            hub: Arc::new(StatusHub::new()),
        }
    }

    /// Creates a keychain talking to the simulation bridge and the loadsheet
    /// server over HTTP.
    ///
    /// # Arguments
    /// - `conf`: The configuration holding both base URLs.
    pub fn from_http(conf: TurnaroundConfig) -> Result<Self, reqwest::Error> {
        let bridge = Arc::new(SimBridge::new(HTTPClient::new(&conf.bridge_url)?));
        let loadsheet = Arc::new(HttpLoadsheetServer::new(HTTPClient::new(&conf.loadsheet_url)?));
        Ok(Self::new(bridge.clone(), bridge.clone(), bridge, loadsheet, conf))
    }

    pub fn telemetry(&self) -> &dyn TelemetrySource { self.telemetry.as_ref() }

    pub fn automation(&self) -> &dyn AutomationAdapter { self.automation.as_ref() }

    pub fn plans(&self) -> &dyn FlightPlanSource { self.plans.as_ref() }

    /// Provides a cloned reference to the loadsheet server, for background tasks.
    pub fn loadsheet(&self) -> Arc<dyn LoadsheetServer> { Arc::clone(&self.loadsheet) }

    pub fn conf(&self) -> &TurnaroundConfig { &self.conf }

    /// Provides a cloned reference to the status hub.
    pub fn hub(&self) -> Arc<StatusHub> { Arc::clone(&self.hub) }
}
