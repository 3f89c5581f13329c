use super::{
    automation::{AdapterError, AutomationAdapter},
    variables,
};
use crate::{log, svc};

/// Mirrors cargo loading and unloading progress into the aircraft's payload
/// and operates the cargo doors around it.
#[derive(Debug, Default)]
pub struct CargoCoordinator {
    planned_kg: f64,
    target_set: bool,
    percent: f64,
    doors_open: bool,
    loading_complete: bool,
    unloading_complete: bool,
}

impl CargoCoordinator {
    pub fn new() -> Self { Self::default() }

    pub fn has_target(&self) -> bool { self.target_set }
    pub fn planned_kg(&self) -> f64 { self.planned_kg }
    pub fn percent(&self) -> f64 { self.percent }
    #[cfg(test)]
    pub fn doors_open(&self) -> bool { self.doors_open }

    pub async fn set_target(&mut self, adapter: &dyn AutomationAdapter, planned_kg: f64) -> Result<(), AdapterError> {
        adapter.write_var(variables::CARGO_PLANNED_KG, planned_kg).await?;
        self.planned_kg = planned_kg;
        self.target_set = true;
        log!("Cargo target set to {planned_kg:.0}kg.");
        Ok(())
    }

    /// Applies the loading progress reported by the automation. Returns true
    /// once all cargo is loaded.
    pub async fn update_loading(&mut self, adapter: &dyn AutomationAdapter, percent: f64) -> Result<bool, AdapterError> {
        if self.loading_complete {
            return Ok(true);
        }
        let percent = percent.clamp(0.0, 100.0);
        self.apply(adapter, percent, self.planned_kg * percent / 100.0).await?;
        if percent >= 100.0 {
            self.loading_complete = true;
            svc!("Cargo loaded, {:.0}kg.", self.planned_kg);
        }
        Ok(self.loading_complete)
    }

    /// Applies the unloading progress reported by the automation.
    pub async fn update_unloading(&mut self, adapter: &dyn AutomationAdapter, percent: f64) -> Result<bool, AdapterError> {
        if self.unloading_complete {
            return Ok(true);
        }
        let percent = percent.clamp(0.0, 100.0);
        self.apply(adapter, percent, self.planned_kg * (1.0 - percent / 100.0)).await?;
        if percent >= 100.0 {
            self.unloading_complete = true;
            svc!("Cargo unloaded.");
        }
        Ok(self.unloading_complete)
    }

    async fn apply(&mut self, adapter: &dyn AutomationAdapter, percent: f64, onboard_kg: f64) -> Result<(), AdapterError> {
        let in_progress = percent > 0.0 && percent < 100.0;
        if in_progress != self.doors_open {
            for door in variables::CARGO_DOORS {
                adapter.write_flag(door, in_progress).await?;
            }
            self.doors_open = in_progress;
        }
        adapter.write_var(variables::CARGO_CURRENT_KG, onboard_kg).await?;
        self.percent = percent;
        Ok(())
    }

    pub fn reset(&mut self) { *self = Self::default(); }
}
