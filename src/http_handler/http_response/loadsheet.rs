use crate::http_handler::http_response::response_common::SerdeJSONBodyHTTPResponseType;
use crate::service_control::LoadsheetResponse;

impl SerdeJSONBodyHTTPResponseType for LoadsheetResponse {}
