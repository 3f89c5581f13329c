use crate::flight_control::FlightPlan;
use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the /flightplan endpoint.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct FlightPlanResponse {
    /// The loaded plan, absent while the crew has not loaded one yet.
    #[serde(default)]
    plan: Option<FlightPlan>,
}

impl FlightPlanResponse {
    pub(crate) fn into_plan(self) -> Option<FlightPlan> { self.plan }
}

impl SerdeJSONBodyHTTPResponseType for FlightPlanResponse {}
