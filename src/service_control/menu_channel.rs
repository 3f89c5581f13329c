use super::automation::{AdapterError, AutomationAdapter};
use crate::{event, log, warn};
use std::{collections::VecDeque, time::Duration};
use strum_macros::Display;
use tokio::time::Instant;

/// Commands issued through the automation's menu.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    Reposition,
    RequestRefuel,
    RequestCatering,
    RequestBoarding,
    RequestDeboarding,
    ToggleJetway,
    ToggleStairs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuStep {
    Open,
    AwaitReady,
    Select(u8),
    Settle(Duration),
}

impl MenuCommand {
    const OPEN_SETTLE: Duration = Duration::from_millis(50);
    const SELECT_SETTLE: Duration = Duration::from_millis(500);
    const REPOSITION_SETTLE: Duration = Duration::from_millis(1500);

    fn steps(self) -> VecDeque<MenuStep> {
        let single = |index| {
            VecDeque::from([
                MenuStep::Open,
                MenuStep::Settle(Self::OPEN_SETTLE),
                MenuStep::AwaitReady,
                MenuStep::Select(index),
                MenuStep::Settle(Self::SELECT_SETTLE),
            ])
        };
        match self {
            MenuCommand::Reposition => VecDeque::from([
                MenuStep::Open,
                MenuStep::Settle(Self::OPEN_SETTLE),
                MenuStep::AwaitReady,
                MenuStep::Select(10),
                MenuStep::Settle(Self::REPOSITION_SETTLE),
                MenuStep::AwaitReady,
                MenuStep::Select(1),
                MenuStep::Settle(Self::REPOSITION_SETTLE),
            ]),
            MenuCommand::RequestDeboarding => single(1),
            MenuCommand::RequestCatering => single(2),
            MenuCommand::RequestRefuel => single(3),
            MenuCommand::RequestBoarding => single(4),
            MenuCommand::ToggleJetway => single(6),
            MenuCommand::ToggleStairs => single(7),
        }
    }
}

#[derive(Debug, Display, Clone, PartialEq)]
pub enum MenuError {
    #[strum(to_string = "menu busy with {running}")]
    Busy { running: MenuCommand },
    #[strum(to_string = "menu did not become ready for {command}")]
    NotReady { command: MenuCommand },
    #[strum(to_string = "{err}")]
    Adapter { err: AdapterError },
}

impl std::error::Error for MenuError {}

impl From<AdapterError> for MenuError {
    fn from(err: AdapterError) -> Self { MenuError::Adapter { err } }
}

/// Outcome of one [`MenuCommandChannel::advance`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuProgress {
    Idle,
    /// A command is in flight and waits for its next step to become due.
    Waiting,
    Completed(MenuCommand),
    Failed(MenuCommand, MenuError),
}

#[derive(Debug)]
struct RunningCommand {
    command: MenuCommand,
    steps: VecDeque<MenuStep>,
    resume_at: Instant,
    ready_deadline: Option<Instant>,
}

/// Sequences "open menu, wait until ready, select entry" against the
/// automation without ever blocking.
///
/// A submitted command is held as a list of pending steps. Each call to
/// [`advance`](Self::advance) executes all steps that are due and stops at
/// the next settle delay or unready menu, recording when to resume. Only one
/// command is in flight at any time.
#[derive(Debug, Default)]
pub struct MenuCommandChannel {
    running: Option<RunningCommand>,
}

impl MenuCommandChannel {
    const READY_POLL: Duration = Duration::from_millis(100);
    const READY_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new() -> Self { Self { running: None } }

    pub fn is_idle(&self) -> bool { self.running.is_none() }

    pub fn running(&self) -> Option<MenuCommand> { self.running.as_ref().map(|r| r.command) }

    /// Point in time the in-flight command wants to be resumed at.
    pub fn resume_at(&self) -> Option<Instant> { self.running.as_ref().map(|r| r.resume_at) }

    pub fn submit(&mut self, command: MenuCommand, now: Instant) -> Result<(), MenuError> {
        if let Some(run) = &self.running {
            return Err(MenuError::Busy { running: run.command });
        }
        event!("Menu command {command} submitted.");
        self.running = Some(RunningCommand {
            command,
            steps: command.steps(),
            resume_at: now,
            ready_deadline: None,
        });
        Ok(())
    }

    pub async fn advance(&mut self, adapter: &dyn AutomationAdapter, now: Instant) -> MenuProgress {
        let Some(run) = self.running.as_mut() else { return MenuProgress::Idle };
        if now < run.resume_at {
            return MenuProgress::Waiting;
        }
        let command = run.command;
        while let Some(step) = run.steps.front().copied() {
            let res = match step {
                MenuStep::Open => adapter.open_menu().await,
                MenuStep::Select(index) => adapter.select_menu_item(index).await,
                MenuStep::Settle(delay) => {
                    run.steps.pop_front();
                    run.resume_at = now + delay;
                    return MenuProgress::Waiting;
                }
                MenuStep::AwaitReady => match adapter.is_menu_ready().await {
                    Ok(true) => {
                        run.ready_deadline = None;
                        Ok(())
                    }
                    Ok(false) => {
                        let deadline = *run.ready_deadline.get_or_insert(now + Self::READY_TIMEOUT);
                        if now >= deadline {
                            return self.fail(command, MenuError::NotReady { command });
                        }
                        run.resume_at = now + Self::READY_POLL;
                        return MenuProgress::Waiting;
                    }
                    Err(e) => Err(e),
                },
            };
            if let Err(e) = res {
                return self.fail(command, MenuError::from(e));
            }
            run.steps.pop_front();
        }
        self.running = None;
        log!("Menu command {command} done.");
        MenuProgress::Completed(command)
    }

    fn fail(&mut self, command: MenuCommand, err: MenuError) -> MenuProgress {
        warn!("Menu command {command} failed: {err}");
        self.running = None;
        MenuProgress::Failed(command, err)
    }
}
