//! HTTP clients of the simulation bridge and the loadsheet server, with one
//! request and one response type per endpoint.

mod common;
pub(crate) mod http_client;
mod http_request;
mod http_response;
mod loadsheet_server;
mod sim_bridge;

pub use common::HTTPError;
pub use loadsheet_server::HttpLoadsheetServer;
pub use sim_bridge::SimBridge;
