use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for reads and writes of a simulation variable.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct VariableResponse {
    /// Name of the variable as known to the bridge.
    name: String,
    /// Current value; booleans are reported as `0.0` / `1.0`.
    value: f64,
}

impl VariableResponse {
    pub(crate) fn name(&self) -> &str { &self.name }
    pub(crate) fn value(&self) -> f64 { self.value }
}

impl SerdeJSONBodyHTTPResponseType for VariableResponse {}
