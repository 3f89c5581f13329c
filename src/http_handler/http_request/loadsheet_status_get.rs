use super::loadsheet_status::LoadsheetStatusResponse;
use super::request_common::{HTTPRequestMethod, HTTPRequestType, NoBodyHTTPRequestType};

/// Request type for the loadsheet server's /status endpoint.
#[derive(Debug)]
pub(crate) struct LoadsheetStatusRequest {}

impl NoBodyHTTPRequestType for LoadsheetStatusRequest {}

impl HTTPRequestType for LoadsheetStatusRequest {
    type Response = LoadsheetStatusResponse;
    fn endpoint(&self) -> &'static str { "/status" }
    fn request_method(&self) -> HTTPRequestMethod { HTTPRequestMethod::Get }
}
