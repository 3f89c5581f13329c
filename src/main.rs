#![allow(clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod flight_control;
mod http_handler;
mod keychain;
mod logger;
#[cfg(test)]
mod mock;
mod mode_control;
mod service_control;

use crate::config::TurnaroundConfig;
use crate::keychain::Keychain;
use crate::mode_control::TurnaroundOrchestrator;
use crate::service_control::LoadsheetKind;
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let conf = TurnaroundConfig::from_env();
    info!("Using simulation bridge at {} and loadsheet server at {}.", conf.bridge_url, conf.loadsheet_url);
    let k = match Keychain::from_http(conf) {
        Ok(k) => k,
        Err(e) => fatal!("Could not set up HTTP clients: {e}"),
    };

    let c_tok = CancellationToken::new();
    spawn_status_logger(&k, c_tok.clone());
    let shutdown_tok = c_tok.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down."),
            Err(e) => error!("Could not listen for Ctrl-C: {e}"),
        }
        shutdown_tok.cancel();
    });

    let mut orchestrator = TurnaroundOrchestrator::new(k);
    spawn_command_reader(orchestrator.retrigger_handle());
    orchestrator.run(c_tok).await;
    info!("Turnaround engine stopped in {} after {} ticks.", orchestrator.phase(), orchestrator.ticks());
}

/// Prints phase changes, status line updates and every ground service state
/// change published by the orchestrator.
fn spawn_status_logger(k: &Keychain, c_tok: CancellationToken) {
    let hub = k.hub();
    let mut phase = hub.phase();
    let mut status = hub.status();
    let mut services = hub.services();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = c_tok.cancelled() => break,
                res = phase.changed() => {
                    if res.is_err() {
                        break;
                    }
                    log!("Now in {}.", *phase.borrow_and_update());
                }
                res = status.changed() => {
                    if res.is_err() {
                        break;
                    }
                    event!("{}", *status.borrow_and_update());
                }
                res = services.recv() => match res {
                    Ok(ev) => svc!("{} is now {}.", ev.service, ev.state),
                    Err(RecvError::Lagged(n)) => warn!("Status logger missed {n} service updates."),
                    Err(RecvError::Closed) => break,
                },
            }
        }
    });
}

/// Maps an operator command line to the loadsheet flow it re-triggers.
fn parse_retrigger(line: &str) -> Option<LoadsheetKind> {
    match line.trim().to_ascii_lowercase().as_str() {
        "retrigger preliminary" => Some(LoadsheetKind::Preliminary),
        "retrigger final" => Some(LoadsheetKind::Final),
        _ => None,
    }
}

/// Reads operator commands from stdin and forwards loadsheet re-triggers to
/// the orchestrator. Runs on a detached thread, a pending read must not hold
/// up runtime shutdown.
fn spawn_command_reader(retrigger_tx: mpsc::UnboundedSender<LoadsheetKind>) {
    std::thread::spawn(move || {
        for res in std::io::stdin().lines() {
            let line = match res {
                Ok(line) => line,
                Err(e) => {
                    warn!("Could not read operator command: {e}");
                    break;
                }
            };
            match parse_retrigger(&line) {
                Some(kind) => {
                    if retrigger_tx.send(kind).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => warn!("Unknown command {:?}, use 'retrigger preliminary' or 'retrigger final'.", line.trim()),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::parse_retrigger;
    use crate::service_control::LoadsheetKind;

    #[test]
    fn test_parse_retrigger() {
        assert_eq!(parse_retrigger("retrigger final\n"), Some(LoadsheetKind::Final));
        assert_eq!(parse_retrigger("  Retrigger Preliminary "), Some(LoadsheetKind::Preliminary));
        assert_eq!(parse_retrigger("retrigger"), None);
        assert_eq!(parse_retrigger("final"), None);
    }
}
