use super::request_common::{HTTPRequestMethod, HTTPRequestType, JSONBodyHTTPRequestType};
use crate::service_control::{LoadsheetKind, LoadsheetResponse};

/// Request type for the /loadsheet endpoint.
#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LoadsheetRequest<'a> {
    /// Preliminary or final loadsheet.
    pub(crate) kind: LoadsheetKind,
    /// Id of the flight plan the loadsheet is generated for.
    pub(crate) flight_id: &'a str,
}

impl JSONBodyHTTPRequestType for LoadsheetRequest<'_> {
    type Body = Self;
    fn body(&self) -> &Self::Body { self }
}

impl HTTPRequestType for LoadsheetRequest<'_> {
    type Response = LoadsheetResponse;
    fn endpoint(&self) -> &'static str { "/loadsheet" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Post }
}
