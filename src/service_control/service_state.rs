use strum_macros::{Display, EnumIter};

/// Lifecycle stage of a ground service as reported by the ground handling
/// automation. Shared by every coordinator.
///
/// Declaration order equals code order, so the derived ordering can be used
/// for threshold checks such as `state >= ServiceState::Requested`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ServiceState {
    Unavailable = 0,
    Bypassed = 1,
    Disconnected = 2,
    Available = 3,
    Requested = 4,
    Active = 5,
    Completed = 6,
}

/// A value that does not map onto [`ServiceState`].
#[derive(Debug, Display, Clone, PartialEq)]
pub enum ServiceStateError {
    #[strum(to_string = "unknown service state code {code}")]
    UnknownCode { code: f64 },
}

impl std::error::Error for ServiceStateError {}

impl TryFrom<f64> for ServiceState {
    type Error = ServiceStateError;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return Err(ServiceStateError::UnknownCode { code: value });
        }
        match value as u8 {
            0 => Ok(ServiceState::Unavailable),
            1 => Ok(ServiceState::Bypassed),
            2 => Ok(ServiceState::Disconnected),
            3 => Ok(ServiceState::Available),
            4 => Ok(ServiceState::Requested),
            5 => Ok(ServiceState::Active),
            6 => Ok(ServiceState::Completed),
            _ => Err(ServiceStateError::UnknownCode { code: value }),
        }
    }
}

impl From<ServiceState> for f64 {
    fn from(value: ServiceState) -> Self { f64::from(value as u8) }
}

impl ServiceState {
    /// Requested, active or already completed.
    pub fn is_at_least_requested(self) -> bool { self >= ServiceState::Requested }
    pub fn is_active(self) -> bool { self == ServiceState::Active }
    pub fn is_completed(self) -> bool { self == ServiceState::Completed }
}

/// Ground services whose state code is published by the automation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum GroundService {
    Refuel,
    Boarding,
    Deboarding,
    Catering,
    Departure,
    Jetway,
    /// Movement sub-state of the jetway (Requested/Active while moving).
    JetwayOperation,
    Stairs,
}

impl GroundService {
    /// Name of the simulation variable carrying this service's state code.
    pub fn state_var(self) -> &'static str {
        match self {
            GroundService::Refuel => "L:FSDT_GSX_REFUELING_STATE",
            GroundService::Boarding => "L:FSDT_GSX_BOARDING_STATE",
            GroundService::Deboarding => "L:FSDT_GSX_DEBOARDING_STATE",
            GroundService::Catering => "L:FSDT_GSX_CATERING_STATE",
            GroundService::Departure => "L:FSDT_GSX_DEPARTURE_STATE",
            GroundService::Jetway => "L:FSDT_GSX_JETWAY",
            GroundService::JetwayOperation => "L:FSDT_GSX_OPERATEJETWAYS_STATE",
            GroundService::Stairs => "L:FSDT_GSX_STAIRS",
        }
    }

    pub fn from_state_var(var: &str) -> Option<Self> {
        <Self as strum::IntoEnumIterator>::iter().find(|s| s.state_var() == var)
    }
}
