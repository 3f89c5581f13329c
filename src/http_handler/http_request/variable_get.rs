use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};
use super::variable::VariableResponse;

/// Request type for reading a single simulation variable.
#[derive(Debug)]
pub(crate) struct VariableGetRequest<'a> {
    /// Name of the variable, e.g. `"SIM ON GROUND"` or `"L:FSDT_GSX_BOARDING_STATE"`.
    pub(crate) name: &'a str,
}

impl NoBodyHTTPRequestType for VariableGetRequest<'_> {}

impl HTTPRequestType for VariableGetRequest<'_> {
    /// Type of the expected response.
    type Response = VariableResponse;
    /// `str` object representing the specific endpoint.
    fn endpoint(&self) -> &'static str { "/variable" }
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
    fn query_params(&self) -> Vec<(&'static str, String)> { vec![("name", self.name.to_string())] }
}
