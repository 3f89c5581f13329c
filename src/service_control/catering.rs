use super::{
    automation::{AdapterError, AutomationAdapter},
    menu_channel::{MenuCommand, MenuCommandChannel, MenuError},
    service_state::ServiceState,
    variables,
};
use crate::{log, svc};
use tokio::time::Instant;

/// Requests catering and keeps the service doors open while the trucks are
/// docked.
#[derive(Debug, Default)]
pub struct CateringCoordinator {
    requested: bool,
    active: bool,
    complete: bool,
    doors_open: bool,
}

impl CateringCoordinator {
    pub fn new() -> Self { Self::default() }

    pub fn is_requested(&self) -> bool { self.requested }
    pub fn is_active(&self) -> bool { self.active }
    pub fn is_complete(&self) -> bool { self.complete }
    #[cfg(test)]
    pub fn doors_open(&self) -> bool { self.doors_open }

    pub fn request_catering_service(&mut self, menu: &mut MenuCommandChannel, now: Instant) -> Result<(), MenuError> {
        if self.requested {
            return Ok(());
        }
        menu.submit(MenuCommand::RequestCatering, now)?;
        self.requested = true;
        svc!("Catering requested.");
        Ok(())
    }

    pub fn on_request_failed(&mut self) {
        if !self.active {
            self.requested = false;
        }
    }

    /// Follows the automation's catering code.
    pub async fn update(&mut self, adapter: &dyn AutomationAdapter, state: ServiceState) -> Result<(), AdapterError> {
        if self.complete {
            return Ok(());
        }
        if state.is_active() && !self.active {
            self.set_doors(adapter, true).await?;
            self.requested = true;
            self.active = true;
            svc!("Catering active.");
        } else if state.is_completed() {
            self.set_doors(adapter, false).await?;
            self.active = false;
            self.complete = true;
            svc!("Catering complete.");
        }
        Ok(())
    }

    /// Catering is not used for this session.
    pub fn skip(&mut self) {
        if !self.complete {
            self.complete = true;
            log!("Catering disabled, treating catering as complete.");
        }
    }

    async fn set_doors(&mut self, adapter: &dyn AutomationAdapter, open: bool) -> Result<(), AdapterError> {
        if self.doors_open == open {
            return Ok(());
        }
        for door in variables::SERVICE_DOORS {
            adapter.write_flag(door, open).await?;
        }
        self.doors_open = open;
        Ok(())
    }

    pub fn reset(&mut self) { *self = Self::default(); }
}
