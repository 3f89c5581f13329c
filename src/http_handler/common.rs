use super::http_request::request_common::RequestError;
use super::http_response::response_common::ResponseError;
use crate::flight_control::TelemetryError;
use crate::service_control::LoadsheetError;
use strum_macros::Display;

#[derive(Debug, Display)]
pub enum HTTPError {
    #[strum(to_string = "{err}")]
    HTTPRequestError { err: RequestError },
    #[strum(to_string = "{err}")]
    HTTPResponseError { err: ResponseError },
}

impl std::error::Error for HTTPError {}

impl HTTPError {
    fn response(&self) -> Option<&ResponseError> {
        match self {
            HTTPError::HTTPRequestError { err: RequestError::Response { err } }
            | HTTPError::HTTPResponseError { err } => Some(err),
            HTTPError::HTTPRequestError { .. } => None,
        }
    }

    pub fn is_no_connection(&self) -> bool {
        matches!(self.response(), Some(ResponseError::NoConnection | ResponseError::Timeout))
    }

    pub fn is_not_found(&self) -> bool { matches!(self.response(), Some(ResponseError::NotFound)) }
}

impl From<RequestError> for HTTPError {
    fn from(err: RequestError) -> Self { HTTPError::HTTPRequestError { err } }
}

impl From<ResponseError> for HTTPError {
    fn from(err: ResponseError) -> Self { HTTPError::HTTPResponseError { err } }
}

impl From<HTTPError> for TelemetryError {
    fn from(value: HTTPError) -> Self {
        if value.is_no_connection() {
            TelemetryError::NoConnection
        } else {
            TelemetryError::Backend { reason: value.to_string() }
        }
    }
}

impl From<HTTPError> for LoadsheetError {
    fn from(value: HTTPError) -> Self { LoadsheetError::Transport { reason: value.to_string() } }
}
