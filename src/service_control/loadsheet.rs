use crate::{error, event, svc, warn};
use async_trait::async_trait;
use std::sync::Arc;
use strum_macros::Display;
use tokio::sync::watch;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum LoadsheetKind {
    Preliminary,
    Final,
}

/// Answer of the loadsheet server to a generation request.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LoadsheetResponse {
    success: bool,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    payload: Option<String>,
}

impl LoadsheetResponse {
    #[cfg(test)]
    pub fn new(success: bool, error_message: Option<&str>, payload: Option<&str>) -> Self {
        Self {
            success,
            error_message: error_message.map(str::to_string),
            payload: payload.map(str::to_string),
        }
    }

    pub fn success(&self) -> bool { self.success }
    pub fn error_message(&self) -> Option<&str> { self.error_message.as_deref() }
    pub fn payload(&self) -> Option<&str> { self.payload.as_deref() }
}

#[derive(Debug, Display, Clone, PartialEq)]
pub enum LoadsheetError {
    /// The availability check answered "not available".
    ServerUnavailable,
    /// The call itself failed (connection, timeout, malformed answer).
    #[strum(to_string = "transport failure: {reason}")]
    Transport { reason: String },
    /// The server answered but refused to generate the loadsheet.
    #[strum(to_string = "rejected: {message}")]
    Rejected { message: String },
    /// The generation task ended without reporting a result.
    TaskAborted,
}

impl std::error::Error for LoadsheetError {}

/// Remote server producing preliminary and final loadsheets.
#[async_trait]
pub trait LoadsheetServer: Send + Sync {
    async fn is_available(&self) -> Result<bool, LoadsheetError>;
    async fn generate(&self, kind: LoadsheetKind, flight_id: &str) -> Result<LoadsheetResponse, LoadsheetError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationState {
    Idle,
    Pending,
    Sent { payload: Option<String> },
    Failed(LoadsheetError),
}

/// One independently latched generation flow.
#[derive(Debug)]
pub struct LoadsheetRecord {
    kind: LoadsheetKind,
    requested: bool,
    state: GenerationState,
    result_rx: Option<watch::Receiver<GenerationState>>,
}

impl LoadsheetRecord {
    fn new(kind: LoadsheetKind) -> Self {
        Self { kind, requested: false, state: GenerationState::Idle, result_rx: None }
    }

    pub fn is_requested(&self) -> bool { self.requested }
    pub fn state(&self) -> &GenerationState { &self.state }
    pub fn is_sent(&self) -> bool { matches!(self.state, GenerationState::Sent { .. }) }
    pub fn is_failed(&self) -> bool { matches!(self.state, GenerationState::Failed(_)) }
    /// The generation finished, successfully or not.
    pub fn is_settled(&self) -> bool { self.is_sent() || self.is_failed() }

    fn collect(&mut self) {
        if self.state != GenerationState::Pending {
            return;
        }
        let Some(rx) = self.result_rx.as_mut() else { return };
        let closed = rx.has_changed().is_err();
        let current = rx.borrow_and_update().clone();
        let settled = match current {
            GenerationState::Pending | GenerationState::Idle if closed => GenerationState::Failed(LoadsheetError::TaskAborted),
            GenerationState::Pending | GenerationState::Idle => return,
            other => other,
        };
        match &settled {
            GenerationState::Sent { .. } => svc!("{} loadsheet generated.", self.kind),
            GenerationState::Failed(LoadsheetError::Rejected { message }) => {
                warn!("{} loadsheet rejected by server: {message}", self.kind);
            }
            GenerationState::Failed(LoadsheetError::ServerUnavailable) => {
                warn!("{} loadsheet not generated, server unavailable.", self.kind);
            }
            GenerationState::Failed(err) => error!("{} loadsheet task failed: {err}", self.kind),
            _ => {}
        }
        self.state = settled;
        self.result_rx = None;
    }
}

/// Runs the preliminary and final loadsheet generation flows.
///
/// Each flow is latched: a request is only dispatched once and a failure is
/// never retried here. Pacing and re-triggering are up to the caller.
#[derive(Debug)]
pub struct LoadsheetCoordinator {
    preliminary: LoadsheetRecord,
    final_sheet: LoadsheetRecord,
}

impl Default for LoadsheetCoordinator {
    fn default() -> Self { Self::new() }
}

impl LoadsheetCoordinator {
    pub fn new() -> Self {
        Self {
            preliminary: LoadsheetRecord::new(LoadsheetKind::Preliminary),
            final_sheet: LoadsheetRecord::new(LoadsheetKind::Final),
        }
    }

    pub fn record(&self, kind: LoadsheetKind) -> &LoadsheetRecord {
        match kind {
            LoadsheetKind::Preliminary => &self.preliminary,
            LoadsheetKind::Final => &self.final_sheet,
        }
    }

    fn record_mut(&mut self, kind: LoadsheetKind) -> &mut LoadsheetRecord {
        match kind {
            LoadsheetKind::Preliminary => &mut self.preliminary,
            LoadsheetKind::Final => &mut self.final_sheet,
        }
    }

    /// Dispatches the generation of `kind` on a background task. Returns
    /// false if this flow was already requested.
    pub fn request_generation(
        &mut self,
        kind: LoadsheetKind,
        server: Arc<dyn LoadsheetServer>,
        flight_id: &str,
    ) -> bool {
        let record = self.record_mut(kind);
        if record.requested {
            return false;
        }
        let (tx, rx) = watch::channel(GenerationState::Pending);
        record.requested = true;
        record.state = GenerationState::Pending;
        record.result_rx = Some(rx);
        let flight_id = flight_id.to_string();
        svc!("Requesting {kind} loadsheet for {flight_id}.");
        tokio::spawn(async move {
            let outcome = Self::generate(server.as_ref(), kind, &flight_id).await;
            tx.send(outcome).ok();
        });
        true
    }

    async fn generate(server: &dyn LoadsheetServer, kind: LoadsheetKind, flight_id: &str) -> GenerationState {
        match server.is_available().await {
            Ok(true) => {}
            Ok(false) => return GenerationState::Failed(LoadsheetError::ServerUnavailable),
            Err(e) => return GenerationState::Failed(e),
        }
        event!("Loadsheet server available, generating {kind}.");
        match server.generate(kind, flight_id).await {
            Ok(resp) if resp.success() => GenerationState::Sent { payload: resp.payload().map(str::to_string) },
            Ok(resp) => GenerationState::Failed(LoadsheetError::Rejected {
                message: resp.error_message().unwrap_or("no message").to_string(),
            }),
            Err(e) => GenerationState::Failed(e),
        }
    }

    /// Picks up finished generations. Called once per tick.
    pub fn poll(&mut self) {
        self.preliminary.collect();
        self.final_sheet.collect();
    }

    /// Clears a failed flow so it can be requested again.
    pub fn retrigger(&mut self, kind: LoadsheetKind) -> bool {
        let record = self.record_mut(kind);
        if !record.is_failed() {
            return false;
        }
        *record = LoadsheetRecord::new(kind);
        true
    }

    pub fn reset(&mut self) { *self = Self::new(); }
}
