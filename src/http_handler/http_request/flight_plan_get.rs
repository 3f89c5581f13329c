use super::flight_plan::FlightPlanResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for the /flightplan endpoint.
#[derive(Debug)]
pub(crate) struct FlightPlanRequest {}

impl NoBodyHTTPRequestType for FlightPlanRequest {}

impl HTTPRequestType for FlightPlanRequest {
    /// Type of the expected response.
    type Response = FlightPlanResponse;
    /// `str` object representing the specific endpoint.
    fn endpoint(&self) -> &'static str { "/flightplan" }
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
