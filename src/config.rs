use crate::warn;
use std::{env, str::FromStr};

/// Runtime options of the turnaround engine.
///
/// All values are read from the environment once at startup. Missing
/// variables fall back to the defaults of [`TurnaroundConfig::default`],
/// malformed ones are reported and ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnaroundConfig {
    /// Base URL of the simulation bridge serving variables and the flight plan.
    pub bridge_url: String,
    /// Base URL of the remote loadsheet server.
    pub loadsheet_url: String,
    /// Drive refueling (and initial fuel/fluids) automatically during DEPARTURE.
    pub auto_refuel: bool,
    /// Request catering right after the refuel request.
    pub call_catering: bool,
    /// Request boarding once refueling completed.
    pub auto_boarding: bool,
    /// Request deboarding on ARRIVAL.
    pub auto_deboarding: bool,
    /// Reposition the aircraft at the gate during PREFLIGHT.
    pub reposition_on_start: bool,
    /// Connect preconditioned air together with the GPU.
    pub connect_pca: bool,
    /// Only call the jetway, never the stairs.
    pub jetway_only: bool,
    /// Simulated fuel flow of the refueling truck in kg/s.
    pub refuel_rate_kgs: f64,
    /// Fill level written to every hydraulic reservoir before departure.
    pub hydraulic_level: f64,
}

impl Default for TurnaroundConfig {
    fn default() -> Self {
        Self {
            bridge_url: String::from("http://localhost:33100"),
            loadsheet_url: String::from("http://localhost:33200"),
            auto_refuel: true,
            call_catering: true,
            auto_boarding: true,
            auto_deboarding: true,
            reposition_on_start: true,
            connect_pca: true,
            jetway_only: false,
            refuel_rate_kgs: 28.0,
            hydraulic_level: 0.98,
        }
    }
}

impl TurnaroundConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self { Self::from_lookup(|key| env::var(key).ok()) }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let mut conf = Self::default();
        if let Some(url) = lookup("TURNAROUND_BRIDGE_URL").filter(|u| !u.trim().is_empty()) {
            conf.bridge_url = url;
        }
        if let Some(url) = lookup("TURNAROUND_LOADSHEET_URL").filter(|u| !u.trim().is_empty()) {
            conf.loadsheet_url = url;
        }
        Self::flag(&lookup, "TURNAROUND_AUTO_REFUEL", &mut conf.auto_refuel);
        Self::flag(&lookup, "TURNAROUND_CALL_CATERING", &mut conf.call_catering);
        Self::flag(&lookup, "TURNAROUND_AUTO_BOARDING", &mut conf.auto_boarding);
        Self::flag(&lookup, "TURNAROUND_AUTO_DEBOARDING", &mut conf.auto_deboarding);
        Self::flag(&lookup, "TURNAROUND_REPOSITION", &mut conf.reposition_on_start);
        Self::flag(&lookup, "TURNAROUND_CONNECT_PCA", &mut conf.connect_pca);
        Self::flag(&lookup, "TURNAROUND_JETWAY_ONLY", &mut conf.jetway_only);
        Self::number(&lookup, "TURNAROUND_REFUEL_RATE_KGS", &mut conf.refuel_rate_kgs);
        Self::number(&lookup, "TURNAROUND_HYD_LEVEL", &mut conf.hydraulic_level);
        if conf.refuel_rate_kgs <= 0.0 {
            warn!("Refuel rate must be positive, using default!");
            conf.refuel_rate_kgs = Self::default().refuel_rate_kgs;
        }
        conf.hydraulic_level = conf.hydraulic_level.clamp(0.0, 1.0);
        conf
    }

    fn flag<F>(lookup: &F, key: &str, target: &mut bool)
    where F: Fn(&str) -> Option<String> {
        let Some(raw) = lookup(key) else { return };
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => *target = true,
            "0" | "false" | "no" | "off" => *target = false,
            other => warn!("Ignoring malformed value '{other}' for {key}!"),
        }
    }

    fn number<F, T>(lookup: &F, key: &str, target: &mut T)
    where
        F: Fn(&str) -> Option<String>,
        T: FromStr,
    {
        let Some(raw) = lookup(key) else { return };
        match raw.trim().parse::<T>() {
            Ok(val) => *target = val,
            Err(_) => warn!("Ignoring malformed value '{raw}' for {key}!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TurnaroundConfig;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let conf = TurnaroundConfig::from_lookup(|_| None);
        assert_eq!(conf, TurnaroundConfig::default());
    }

    #[test]
    fn test_overrides_and_malformed_values() {
        let conf = TurnaroundConfig::from_lookup(lookup_from(&[
            ("TURNAROUND_BRIDGE_URL", "http://sim:9000"),
            ("TURNAROUND_AUTO_REFUEL", "off"),
            ("TURNAROUND_CALL_CATERING", "maybe"),
            ("TURNAROUND_REFUEL_RATE_KGS", "40.5"),
            ("TURNAROUND_HYD_LEVEL", "1.7"),
        ]));
        assert_eq!(conf.bridge_url, "http://sim:9000");
        assert!(!conf.auto_refuel);
        assert!(conf.call_catering);
        assert!((conf.refuel_rate_kgs - 40.5).abs() < f64::EPSILON);
        assert!((conf.hydraulic_level - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_positive_refuel_rate_falls_back() {
        let conf = TurnaroundConfig::from_lookup(lookup_from(&[("TURNAROUND_REFUEL_RATE_KGS", "-3")]));
        assert!((conf.refuel_rate_kgs - 28.0).abs() < f64::EPSILON);
    }
}
