use super::super::{
    http_client::HTTPClient,
    http_response::response_common::{HTTPResponseType, ResponseError},
};
use strum_macros::Display;

/// HTTP methods used by the bridge and the loadsheet server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HTTPRequestMethod {
    Get,
    Post,
    Put,
}

/// Common description of a request against one endpoint.
pub(crate) trait HTTPRequestType {
    /// Type of the expected response.
    type Response: HTTPResponseType;
    /// `str` object representing the specific endpoint.
    fn endpoint(&self) -> &'static str;
    /// The corresponding HTTP Request Method.
    fn request_method(&self) -> HTTPRequestMethod;
    /// Query parameters appended to the endpoint.
    fn query_params(&self) -> Vec<(&'static str, String)> { Vec::new() }

    fn request_builder(&self, client: &HTTPClient) -> reqwest::RequestBuilder {
        let url = format!("{}{}", client.url(), self.endpoint());
        let builder = match self.request_method() {
            HTTPRequestMethod::Get => client.client().get(url),
            HTTPRequestMethod::Post => client.client().post(url),
            HTTPRequestMethod::Put => client.client().put(url),
        };
        let query = self.query_params();
        if query.is_empty() { builder } else { builder.query(&query) }
    }
}

/// Request type without a body.
pub(crate) trait NoBodyHTTPRequestType: HTTPRequestType {
    async fn send_request(
        &self,
        client: &HTTPClient,
    ) -> Result<<Self::Response as HTTPResponseType>::ParsedResponseType, RequestError> {
        let response = self.request_builder(client).send().await?;
        Ok(Self::Response::read_response(response).await?)
    }
}

/// Request type carrying a json body.
pub(crate) trait JSONBodyHTTPRequestType: HTTPRequestType {
    /// The type of the json body.
    type Body: serde::Serialize;
    /// Returns the serializable object.
    fn body(&self) -> &Self::Body;

    async fn send_request(
        &self,
        client: &HTTPClient,
    ) -> Result<<Self::Response as HTTPResponseType>::ParsedResponseType, RequestError> {
        let response = self.request_builder(client).json(self.body()).send().await?;
        Ok(Self::Response::read_response(response).await?)
    }
}

#[derive(Debug, Display)]
pub enum RequestError {
    #[strum(to_string = "request failed: {reason}")]
    Send { reason: String },
    #[strum(to_string = "{err}")]
    Response { err: ResponseError },
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_connect() || value.is_timeout() {
            RequestError::Response { err: ResponseError::from(value) }
        } else {
            RequestError::Send { reason: value.to_string() }
        }
    }
}

impl From<ResponseError> for RequestError {
    fn from(err: ResponseError) -> Self { RequestError::Response { err } }
}
