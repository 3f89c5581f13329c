use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use super::variable::VariableResponse;

/// Request type for writing a single simulation variable.
#[derive(serde::Serialize, Debug)]
pub(crate) struct VariablePutRequest<'a> {
    pub(crate) name: &'a str,
    pub(crate) value: f64,
}

impl JSONBodyHTTPRequestType for VariablePutRequest<'_> {
    /// The type of the json body.
    type Body = Self;
    /// Returns the serializable object.
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for VariablePutRequest<'_> {
    /// Type of the expected response.
    type Response = VariableResponse;
    /// `str` object representing the specific endpoint.
    fn endpoint(&self) -> &'static str { "/variable" }
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Put }
}
