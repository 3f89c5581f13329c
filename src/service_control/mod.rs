//! Coordinators for the individual ground services and the narrow command
//! surface (variables and menu) they drive the ground handling automation
//! through.

mod automation;
mod boarding;
mod cargo;
mod catering;
mod equipment;
mod loadsheet;
mod menu_channel;
mod refueling;
mod service_state;
#[cfg(test)]
mod tests;
pub mod variables;

pub use automation::{AdapterError, AutomationAdapter, VariableChange, VariableWatch};
pub use boarding::BoardingCoordinator;
pub use cargo::CargoCoordinator;
pub use catering::CateringCoordinator;
pub use equipment::{EquipmentCoordinator, RemovalOutcome};
pub use loadsheet::{LoadsheetCoordinator, LoadsheetError, LoadsheetKind, LoadsheetResponse, LoadsheetServer};
pub use menu_channel::{MenuCommand, MenuCommandChannel, MenuError, MenuProgress};
pub use refueling::RefuelingCoordinator;
pub use service_state::{GroundService, ServiceState};

use strum_macros::Display;

/// Error of a coordinator operation touching both variables and the menu.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum ServiceError {
    #[strum(to_string = "{err}")]
    Adapter { err: AdapterError },
    #[strum(to_string = "{err}")]
    Menu { err: MenuError },
}

impl std::error::Error for ServiceError {}

impl From<AdapterError> for ServiceError {
    fn from(err: AdapterError) -> Self { ServiceError::Adapter { err } }
}

impl From<MenuError> for ServiceError {
    fn from(err: MenuError) -> Self { ServiceError::Menu { err } }
}
