use super::common::HTTPError;
use super::http_client::HTTPClient;
use super::http_request::{
    flight_plan_get::FlightPlanRequest,
    request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType},
    variable_get::VariableGetRequest,
    variable_put::VariablePutRequest,
};
use crate::event;
use crate::flight_control::{FlightPlan, FlightPlanSource, TelemetryError, TelemetrySource};
use crate::service_control::{AdapterError, AutomationAdapter};
use async_trait::async_trait;

/// Simulator variables backing the telemetry readings.
const ON_GROUND: &str = "SIM ON GROUND";
const ENGINE_N2: [&str; 2] = ["TURB ENG N2:1", "TURB ENG N2:2"];
const PARKING_BRAKE: &str = "BRAKE PARKING POSITION";
const BEACON: &str = "LIGHT BEACON";
const EXT_POWER_AVAILABLE: &str = "EXTERNAL POWER AVAILABLE";
const GROUND_SPEED: &str = "GPS GROUND SPEED";

/// HTTP client of the simulation bridge. Serves telemetry, the ground
/// handling automation's variables and the loaded flight plan.
#[derive(Debug)]
pub struct SimBridge {
    client: HTTPClient,
}

impl SimBridge {
    pub(crate) fn new(client: HTTPClient) -> Self { Self { client } }

    async fn get(&self, name: &str) -> Result<f64, HTTPError> {
        let resp = VariableGetRequest { name }.send_request(&self.client).await?;
        Ok(resp.value())
    }

    async fn put(&self, name: &str, value: f64) -> Result<(), HTTPError> {
        let resp = VariablePutRequest { name, value }.send_request(&self.client).await?;
        event!("Bridge wrote {} = {}.", resp.name(), resp.value());
        Ok(())
    }

    async fn reading(&self, name: &'static str) -> Result<f64, TelemetryError> {
        let value = self.get(name).await?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(TelemetryError::InvalidValue { reading: name, value: value.to_string() })
        }
    }

    fn adapter_error(name: &str, err: &HTTPError) -> AdapterError {
        if err.is_not_found() {
            AdapterError::UnknownVariable { name: name.to_string() }
        } else if err.is_no_connection() {
            AdapterError::NoConnection
        } else {
            AdapterError::Backend { reason: err.to_string() }
        }
    }
}

#[async_trait]
impl TelemetrySource for SimBridge {
    async fn on_ground(&self) -> Result<bool, TelemetryError> { Ok(self.reading(ON_GROUND).await? > 0.5) }

    async fn engine_samples(&self) -> Result<Vec<f64>, TelemetryError> {
        let mut samples = Vec::with_capacity(ENGINE_N2.len());
        for var in ENGINE_N2 {
            samples.push(self.reading(var).await?);
        }
        Ok(samples)
    }

    async fn parking_brake_set(&self) -> Result<bool, TelemetryError> {
        Ok(self.reading(PARKING_BRAKE).await? > 0.5)
    }

    async fn beacon_on(&self) -> Result<bool, TelemetryError> { Ok(self.reading(BEACON).await? > 0.5) }

    async fn external_power_available(&self) -> Result<bool, TelemetryError> {
        Ok(self.reading(EXT_POWER_AVAILABLE).await? > 0.5)
    }

    async fn ground_speed(&self) -> Result<f64, TelemetryError> { self.reading(GROUND_SPEED).await }
}

#[async_trait]
impl AutomationAdapter for SimBridge {
    async fn read_var(&self, name: &str) -> Result<f64, AdapterError> {
        self.get(name).await.map_err(|e| Self::adapter_error(name, &e))
    }

    async fn write_var(&self, name: &str, value: f64) -> Result<(), AdapterError> {
        self.put(name, value).await.map_err(|e| Self::adapter_error(name, &e))
    }
}

#[async_trait]
impl FlightPlanSource for SimBridge {
    async fn current_plan(&self) -> Result<Option<FlightPlan>, AdapterError> {
        let resp = FlightPlanRequest {}.send_request(&self.client).await;
        match resp {
            Ok(resp) => Ok(resp.into_plan()),
            Err(e) => Err(Self::adapter_error("flightplan", &HTTPError::from(e))),
        }
    }
}
