use super::{
    service_state::{GroundService, ServiceState, ServiceStateError},
    variables,
};
use crate::event;
use async_trait::async_trait;
use strum_macros::Display;

/// Failure talking to the ground handling automation or the simulation bridge.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum AdapterError {
    NoConnection,
    #[strum(to_string = "unknown variable {name}")]
    UnknownVariable { name: String },
    #[strum(to_string = "{err}")]
    InvalidState { err: ServiceStateError },
    #[strum(to_string = "menu index {index} out of range")]
    InvalidMenuIndex { index: u8 },
    #[strum(to_string = "backend error: {reason}")]
    Backend { reason: String },
}

impl std::error::Error for AdapterError {}

impl From<ServiceStateError> for AdapterError {
    fn from(err: ServiceStateError) -> Self { AdapterError::InvalidState { err } }
}

/// Narrow command and query surface of the external ground handling
/// automation and the flight-management simulation interface.
///
/// Implementors only provide raw variable access; everything else is
/// expressed on top of it.
#[async_trait]
pub trait AutomationAdapter: Send + Sync {
    async fn read_var(&self, name: &str) -> Result<f64, AdapterError>;
    async fn write_var(&self, name: &str, value: f64) -> Result<(), AdapterError>;

    async fn read_flag(&self, name: &str) -> Result<bool, AdapterError> {
        Ok(self.read_var(name).await? > 0.5)
    }

    async fn write_flag(&self, name: &str, value: bool) -> Result<(), AdapterError> {
        self.write_var(name, if value { 1.0 } else { 0.0 }).await
    }

    async fn service_state(&self, service: GroundService) -> Result<ServiceState, AdapterError> {
        let code = self.read_var(service.state_var()).await?;
        Ok(ServiceState::try_from(code)?)
    }

    async fn fuel_hose_connected(&self) -> Result<bool, AdapterError> {
        self.read_flag(variables::FUEL_HOSE_CONNECTED).await
    }

    async fn open_menu(&self) -> Result<(), AdapterError> {
        self.write_flag(variables::MENU_OPEN, true).await
    }

    async fn is_menu_ready(&self) -> Result<bool, AdapterError> {
        self.read_flag(variables::MENU_READY).await
    }

    /// Selects the menu entry at the 1-based `index`.
    async fn select_menu_item(&self, index: u8) -> Result<(), AdapterError> {
        if index == 0 {
            return Err(AdapterError::InvalidMenuIndex { index });
        }
        self.write_var(variables::MENU_CHOICE, f64::from(index - 1)).await
    }
}

/// A change of a watched variable between two polls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableChange {
    pub var: &'static str,
    pub old: f64,
    pub new: f64,
}

pub type ChangeCallback = Box<dyn Fn(&VariableChange) + Send + Sync>;

/// Polls a fixed set of variables and hands every observed change to the
/// subscribed callbacks. The first sample of a variable is only recorded.
pub struct VariableWatch {
    watched: Vec<(&'static str, Option<f64>)>,
    callbacks: Vec<ChangeCallback>,
}

impl VariableWatch {
    pub fn new(vars: &[&'static str]) -> Self {
        Self { watched: vars.iter().map(|v| (*v, None)).collect(), callbacks: Vec::new() }
    }

    pub fn subscribe(&mut self, callback: ChangeCallback) { self.callbacks.push(callback); }

    pub async fn poll(&mut self, adapter: &dyn AutomationAdapter) -> Vec<VariableChange> {
        let mut changes = Vec::new();
        for (name, last) in &mut self.watched {
            let var: &'static str = *name;
            let new = match adapter.read_var(var).await {
                Ok(val) => val,
                Err(e) => {
                    event!("Watch read of {var} failed: {e}");
                    continue;
                }
            };
            if let Some(old) = last.replace(new) {
                if (old - new).abs() > f64::EPSILON {
                    changes.push(VariableChange { var, old, new });
                }
            }
        }
        for change in &changes {
            for cb in &self.callbacks {
                cb(change);
            }
        }
        changes
    }
}
