use crate::service_control::AdapterError;
use async_trait::async_trait;

/// The operational flight plan a turnaround is prepared for.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct FlightPlan {
    id: String,
    callsign: String,
    fuel_planned_kg: f64,
    passengers: u32,
    cargo_kg: f64,
}

impl FlightPlan {
    #[cfg(test)]
    pub fn new(id: &str, callsign: &str, fuel_planned_kg: f64, passengers: u32, cargo_kg: f64) -> Self {
        Self {
            id: id.to_string(),
            callsign: callsign.to_string(),
            fuel_planned_kg,
            passengers,
            cargo_kg,
        }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn callsign(&self) -> &str { &self.callsign }
    pub fn fuel_planned_kg(&self) -> f64 { self.fuel_planned_kg }
    pub fn passengers(&self) -> u32 { self.passengers }
    pub fn cargo_kg(&self) -> f64 { self.cargo_kg }
}

/// Provider of the currently loaded flight plan, if any.
#[async_trait]
pub trait FlightPlanSource: Send + Sync {
    async fn current_plan(&self) -> Result<Option<FlightPlan>, AdapterError>;
}
