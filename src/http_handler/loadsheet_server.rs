use super::common::HTTPError;
use super::http_client::HTTPClient;
use super::http_request::{
    loadsheet_post::LoadsheetRequest,
    loadsheet_status_get::LoadsheetStatusRequest,
    request_common::{JSONBodyHTTPRequestType, NoBodyHTTPRequestType},
};
use crate::service_control::{LoadsheetError, LoadsheetKind, LoadsheetResponse, LoadsheetServer};
use async_trait::async_trait;

/// HTTP client of the remote loadsheet server.
#[derive(Debug)]
pub struct HttpLoadsheetServer {
    client: HTTPClient,
}

impl HttpLoadsheetServer {
    pub(crate) fn new(client: HTTPClient) -> Self { Self { client } }
}

#[async_trait]
impl LoadsheetServer for HttpLoadsheetServer {
    async fn is_available(&self) -> Result<bool, LoadsheetError> {
        let status = LoadsheetStatusRequest {}.send_request(&self.client).await.map_err(HTTPError::from)?;
        Ok(status.is_available())
    }

    async fn generate(&self, kind: LoadsheetKind, flight_id: &str) -> Result<LoadsheetResponse, LoadsheetError> {
        let resp = LoadsheetRequest { kind, flight_id }.send_request(&self.client).await.map_err(HTTPError::from)?;
        Ok(resp)
    }
}
