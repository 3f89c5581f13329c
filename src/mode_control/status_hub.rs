use crate::flight_control::FlightPhase;
use crate::service_control::{GroundService, ServiceState};
use tokio::sync::{broadcast, watch};

/// A ground service changed its reported state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatusEvent {
    pub service: GroundService,
    pub state: ServiceState,
}

/// Read-only feed of the engine's state for whatever presents it.
///
/// Publishing never fails: the engine does not depend on anyone listening.
#[derive(Debug)]
pub struct StatusHub {
    phase_tx: watch::Sender<FlightPhase>,
    status_tx: watch::Sender<String>,
    service_tx: broadcast::Sender<ServiceStatusEvent>,
}

impl Default for StatusHub {
    fn default() -> Self { Self::new() }
}

impl StatusHub {
    const SERVICE_EVENT_CAPACITY: usize = 32;

    pub fn new() -> Self {
        let (phase_tx, _) = watch::channel(FlightPhase::Preflight);
        let (status_tx, _) = watch::channel(String::new());
        let (service_tx, _) = broadcast::channel(Self::SERVICE_EVENT_CAPACITY);
        Self { phase_tx, status_tx, service_tx }
    }

    pub fn publish_phase(&self, phase: FlightPhase) {
        self.phase_tx.send_if_modified(|current| {
            let changed = *current != phase;
            *current = phase;
            changed
        });
    }

    pub fn publish_status(&self, status: &str) {
        self.status_tx.send_if_modified(|current| {
            if current == status {
                return false;
            }
            status.clone_into(current);
            true
        });
    }

    pub fn publish_service(&self, event: ServiceStatusEvent) { self.service_tx.send(event).ok(); }

    pub fn phase(&self) -> watch::Receiver<FlightPhase> { self.phase_tx.subscribe() }
    pub fn status(&self) -> watch::Receiver<String> { self.status_tx.subscribe() }
    pub fn services(&self) -> broadcast::Receiver<ServiceStatusEvent> { self.service_tx.subscribe() }
}
