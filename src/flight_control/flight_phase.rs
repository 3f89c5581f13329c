use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;
use strum_macros::{Display, EnumIter};

/// The seven operational phases of one aircraft turnaround cycle.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy, Hash, EnumIter)]
pub enum FlightPhase {
    Preflight,
    Departure,
    TaxiOut,
    Flight,
    TaxiIn,
    Arrival,
    Turnaround,
}

impl From<&str> for FlightPhase {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "departure" => FlightPhase::Departure,
            "taxiout" => FlightPhase::TaxiOut,
            "flight" => FlightPhase::Flight,
            "taxiin" => FlightPhase::TaxiIn,
            "arrival" => FlightPhase::Arrival,
            "turnaround" => FlightPhase::Turnaround,
            _ => FlightPhase::Preflight,
        }
    }
}

impl From<FlightPhase> for &'static str {
    fn from(value: FlightPhase) -> Self {
        match value {
            FlightPhase::Preflight => "preflight",
            FlightPhase::Departure => "departure",
            FlightPhase::TaxiOut => "taxiout",
            FlightPhase::Flight => "flight",
            FlightPhase::TaxiIn => "taxiin",
            FlightPhase::Arrival => "arrival",
            FlightPhase::Turnaround => "turnaround",
        }
    }
}

impl FlightPhase {
    /// Documented successors of this phase. The in-flight start override
    /// (`Preflight -> Flight`) is deliberately not part of this graph.
    pub fn successors(self) -> &'static [FlightPhase] {
        PHASE_SUCCESSORS.get(&self).map_or(&[], |s| *s)
    }

    pub fn poll_interval(self) -> Duration {
        POLL_INTERVAL_LOOKUP.get(&self).copied().unwrap_or(SHORT_POLL_INTERVAL)
    }
}

const SHORT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
const TAXI_IN_POLL_INTERVAL: Duration = Duration::from_millis(2500);
const TAXI_OUT_POLL_INTERVAL: Duration = Duration::from_secs(60);
const CRUISE_POLL_INTERVAL: Duration = Duration::from_secs(180);

pub static PHASE_SUCCESSORS: LazyLock<HashMap<FlightPhase, &'static [FlightPhase]>> =
    LazyLock::new(|| {
        HashMap::from([
            (FlightPhase::Preflight, &[FlightPhase::Departure][..]),
            (FlightPhase::Departure, &[FlightPhase::TaxiOut][..]),
            (FlightPhase::TaxiOut, &[FlightPhase::Flight][..]),
            (FlightPhase::Flight, &[FlightPhase::TaxiIn][..]),
            (FlightPhase::TaxiIn, &[FlightPhase::Arrival][..]),
            (FlightPhase::Arrival, &[FlightPhase::Turnaround][..]),
            (FlightPhase::Turnaround, &[FlightPhase::Departure][..]),
        ])
    });

pub static POLL_INTERVAL_LOOKUP: LazyLock<HashMap<FlightPhase, Duration>> =
    LazyLock::new(|| {
        HashMap::from([
            (FlightPhase::Preflight, SHORT_POLL_INTERVAL),
            (FlightPhase::Departure, SHORT_POLL_INTERVAL),
            (FlightPhase::TaxiOut, TAXI_OUT_POLL_INTERVAL),
            (FlightPhase::Flight, CRUISE_POLL_INTERVAL),
            (FlightPhase::TaxiIn, TAXI_IN_POLL_INTERVAL),
            (FlightPhase::Arrival, SHORT_POLL_INTERVAL),
            (FlightPhase::Turnaround, SHORT_POLL_INTERVAL),
        ])
    });
