use super::{
    ServiceError,
    automation::{AdapterError, AutomationAdapter},
    menu_channel::{MenuCommand, MenuCommandChannel},
    service_state::{GroundService, ServiceState},
    variables,
};
use crate::{event, svc};
use tokio::time::Instant;

/// Result of one attempt to remove jetway and stairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// A removal command was handed to the menu.
    Issued(MenuCommand),
    /// The jetway is connected but still moving, try again later.
    Skipped,
    /// Nothing (more) to remove.
    Clear,
}

/// Ground power, preconditioned air, chocks, jetway and stairs.
///
/// Flag-style equipment is read before it is written, so repeated calls
/// issue no further commands. Jetway and stairs are toggled through the menu
/// and the automation reflects a toggle only with a delay, so every toggle is
/// issued at most once until [`reset`](Self::reset) or a reported failure.
#[derive(Debug, Default)]
pub struct EquipmentCoordinator {
    jetway_called: bool,
    stairs_called: bool,
    jetway_removal: bool,
    stairs_removal: bool,
}

impl EquipmentCoordinator {
    pub fn new() -> Self { Self::default() }

    async fn set_flag(
        adapter: &dyn AutomationAdapter,
        var: &str,
        value: bool,
        what: &str,
    ) -> Result<bool, AdapterError> {
        if adapter.read_flag(var).await? == value {
            event!("{what} already {}.", if value { "connected" } else { "disconnected" });
            return Ok(false);
        }
        adapter.write_flag(var, value).await?;
        svc!("{what} {}.", if value { "connected" } else { "disconnected" });
        Ok(true)
    }

    pub async fn connect_gpu(&self, adapter: &dyn AutomationAdapter) -> Result<bool, AdapterError> {
        Self::set_flag(adapter, variables::GROUND_POWER, true, "GPU").await
    }

    pub async fn disconnect_gpu(&self, adapter: &dyn AutomationAdapter) -> Result<bool, AdapterError> {
        Self::set_flag(adapter, variables::GROUND_POWER, false, "GPU").await
    }

    pub async fn connect_pca(&self, adapter: &dyn AutomationAdapter) -> Result<bool, AdapterError> {
        Self::set_flag(adapter, variables::PRECONDITIONED_AIR, true, "PCA").await
    }

    pub async fn disconnect_pca(&self, adapter: &dyn AutomationAdapter) -> Result<bool, AdapterError> {
        Self::set_flag(adapter, variables::PRECONDITIONED_AIR, false, "PCA").await
    }

    pub async fn set_chocks(&self, adapter: &dyn AutomationAdapter, set: bool) -> Result<bool, AdapterError> {
        Self::set_flag(adapter, variables::CHOCKS, set, "Chocks").await
    }

    fn is_moving(state: ServiceState) -> bool {
        matches!(state, ServiceState::Requested | ServiceState::Active)
    }

    fn is_callable(state: ServiceState) -> bool {
        !matches!(state, ServiceState::Unavailable | ServiceState::Requested | ServiceState::Active)
    }

    /// Calls the jetway and, unless `jetway_only`, the stairs. At most one
    /// menu command is issued per call; `None` means nothing is left to call.
    pub async fn call_jetway_stairs(
        &mut self,
        adapter: &dyn AutomationAdapter,
        menu: &mut MenuCommandChannel,
        now: Instant,
        jetway_only: bool,
    ) -> Result<Option<MenuCommand>, ServiceError> {
        if !self.jetway_called {
            let jetway = adapter.service_state(GroundService::Jetway).await?;
            let operating = adapter.service_state(GroundService::JetwayOperation).await?;
            if Self::is_callable(jetway) && !Self::is_moving(operating) {
                menu.submit(MenuCommand::ToggleJetway, now)?;
                self.jetway_called = true;
                svc!("Jetway called.");
                return Ok(Some(MenuCommand::ToggleJetway));
            }
        }
        if jetway_only || self.stairs_called {
            return Ok(None);
        }
        let stairs = adapter.service_state(GroundService::Stairs).await?;
        if Self::is_callable(stairs) {
            menu.submit(MenuCommand::ToggleStairs, now)?;
            self.stairs_called = true;
            svc!("Stairs called.");
            return Ok(Some(MenuCommand::ToggleStairs));
        }
        Ok(None)
    }

    /// Retracts a connected jetway once it finished moving, then removes
    /// connected stairs. One command per call.
    pub async fn remove_jetway_stairs(
        &mut self,
        adapter: &dyn AutomationAdapter,
        menu: &mut MenuCommandChannel,
        now: Instant,
    ) -> Result<RemovalOutcome, ServiceError> {
        if !self.jetway_removal && adapter.service_state(GroundService::Jetway).await? == ServiceState::Active {
            let operating = adapter.service_state(GroundService::JetwayOperation).await?;
            if Self::is_moving(operating) {
                event!("Jetway still moving, removal deferred.");
                return Ok(RemovalOutcome::Skipped);
            }
            menu.submit(MenuCommand::ToggleJetway, now)?;
            self.jetway_removal = true;
            svc!("Jetway removal requested.");
            return Ok(RemovalOutcome::Issued(MenuCommand::ToggleJetway));
        }
        if !self.stairs_removal && adapter.service_state(GroundService::Stairs).await? == ServiceState::Active {
            menu.submit(MenuCommand::ToggleStairs, now)?;
            self.stairs_removal = true;
            svc!("Stairs removal requested.");
            return Ok(RemovalOutcome::Issued(MenuCommand::ToggleStairs));
        }
        Ok(RemovalOutcome::Clear)
    }

    /// A jetway or stairs toggle failed in the menu, allow issuing it again.
    /// Returns true if the failed toggle was a call rather than a removal.
    pub fn on_toggle_failed(&mut self, command: MenuCommand) -> bool {
        match command {
            MenuCommand::ToggleJetway if self.jetway_removal => self.jetway_removal = false,
            MenuCommand::ToggleJetway => {
                self.jetway_called = false;
                return true;
            }
            MenuCommand::ToggleStairs if self.stairs_removal => self.stairs_removal = false,
            MenuCommand::ToggleStairs => {
                self.stairs_called = false;
                return true;
            }
            _ => {}
        }
        false
    }

    /// GPU, PCA and chocks off. Returns whether any command was issued.
    pub async fn disconnect_all_ground_services(&self, adapter: &dyn AutomationAdapter) -> Result<bool, AdapterError> {
        let gpu = self.disconnect_gpu(adapter).await?;
        let pca = self.disconnect_pca(adapter).await?;
        let chocks = self.set_chocks(adapter, false).await?;
        Ok(gpu || pca || chocks)
    }

    pub fn reset(&mut self) { *self = Self::default(); }
}
