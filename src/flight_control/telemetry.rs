use crate::warn;
use async_trait::async_trait;
use strum_macros::Display;

/// Failure to obtain a single telemetry reading.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum TelemetryError {
    NoConnection,
    #[strum(to_string = "invalid value for {reading}: {value}")]
    InvalidValue { reading: &'static str, value: String },
    #[strum(to_string = "backend error: {reason}")]
    Backend { reason: String },
}

impl std::error::Error for TelemetryError {}

/// Read-only view on the aircraft state as exposed by the simulator.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn on_ground(&self) -> Result<bool, TelemetryError>;
    /// High pressure spool speed (N2, percent) for every engine.
    async fn engine_samples(&self) -> Result<Vec<f64>, TelemetryError>;
    async fn parking_brake_set(&self) -> Result<bool, TelemetryError>;
    async fn beacon_on(&self) -> Result<bool, TelemetryError>;
    async fn external_power_available(&self) -> Result<bool, TelemetryError>;
    /// Ground speed in knots.
    async fn ground_speed(&self) -> Result<f64, TelemetryError>;
}

/// The last known telemetry values, refreshed once per tick.
///
/// A failed read keeps the previously known value, which starts out as an
/// aircraft parked cold and dark at a gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySnapshot {
    on_ground: bool,
    engines_running: bool,
    parking_brake: bool,
    beacon: bool,
    ext_power_available: bool,
    ground_speed: f64,
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            on_ground: true,
            engines_running: false,
            parking_brake: true,
            beacon: false,
            ext_power_available: false,
            ground_speed: 0.0,
        }
    }
}

impl TelemetrySnapshot {
    /// N2 above which an engine counts as running.
    pub const ENGINE_RUNNING_N2: f64 = 18.0;
    /// Ground speed in knots below which the aircraft counts as standing still.
    pub const STANDSTILL_GS: f64 = 1.0;

    #[cfg(test)]
    pub fn new(
        on_ground: bool,
        engines_running: bool,
        parking_brake: bool,
        beacon: bool,
        ext_power_available: bool,
        ground_speed: f64,
    ) -> Self {
        Self { on_ground, engines_running, parking_brake, beacon, ext_power_available, ground_speed }
    }

    pub fn on_ground(&self) -> bool { self.on_ground }
    pub fn engines_running(&self) -> bool { self.engines_running }
    pub fn parking_brake(&self) -> bool { self.parking_brake }
    pub fn beacon(&self) -> bool { self.beacon }
    pub fn ext_power_available(&self) -> bool { self.ext_power_available }
    pub fn ground_speed(&self) -> f64 { self.ground_speed }

    /// Engines off, parking brake set and (nearly) no ground speed.
    pub fn is_parked(&self) -> bool {
        self.on_ground
            && !self.engines_running
            && self.parking_brake
            && self.ground_speed < Self::STANDSTILL_GS
    }

    /// Reads every value from `source`, substituting the previous value for
    /// each reading that fails.
    pub async fn refresh(&mut self, source: &dyn TelemetrySource) {
        self.on_ground = Self::or_keep("on ground", source.on_ground().await, self.on_ground);
        self.engines_running = Self::or_keep(
            "engine samples",
            source.engine_samples().await.map(|s| Self::any_engine_running(&s)),
            self.engines_running,
        );
        self.parking_brake =
            Self::or_keep("parking brake", source.parking_brake_set().await, self.parking_brake);
        self.beacon = Self::or_keep("beacon", source.beacon_on().await, self.beacon);
        self.ext_power_available = Self::or_keep(
            "external power",
            source.external_power_available().await,
            self.ext_power_available,
        );
        self.ground_speed =
            Self::or_keep("ground speed", source.ground_speed().await, self.ground_speed);
    }

    fn any_engine_running(samples: &[f64]) -> bool {
        samples.iter().any(|n2| *n2 >= Self::ENGINE_RUNNING_N2)
    }

    fn or_keep<T: Copy>(reading: &str, res: Result<T, TelemetryError>, prev: T) -> T {
        res.unwrap_or_else(|e| {
            warn!("Telemetry read '{reading}' failed ({e}), keeping last value.");
            prev
        })
    }
}
