use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;

/// Response type for the loadsheet server's /status endpoint.
#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LoadsheetStatusResponse {
    available: bool,
}

impl LoadsheetStatusResponse {
    pub(crate) fn is_available(&self) -> bool { self.available }
}

impl SerdeJSONBodyHTTPResponseType for LoadsheetStatusResponse {}
