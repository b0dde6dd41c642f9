//! Run-session controller: pick a target, provision its directory, run the task.
//!
//! A run walks `Idle -> AwaitingSelection`, then either stops at `Cancelled`
//! or goes `Provisioning -> Spawning -> Streaming -> Waiting -> Done`.
//! Any error ends the run where it happened; nothing is retried.

pub mod clock;
pub mod provision;
pub mod supervisor;

use std::fmt;
use std::io::Write;

use crate::config::{SessionPaths, TaskCommand};
use crate::domain::session::Selection;
use crate::error::SessionError;
use crate::session::clock::Clock;
use crate::session::provision::{provision, write_descriptor};
use crate::session::supervisor::RunningTask;
use crate::terminal::Selector;

pub const OUTPUT_LOG_NAME: &str = "output.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingSelection,
    Cancelled,
    Provisioning,
    Spawning,
    Streaming,
    Waiting,
    Done(i32),
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Done(code) => write!(f, "done (exit {code})"),
            other => write!(f, "{}", format!("{other:?}").to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The prompt was aborted; nothing was written or spawned.
    Cancelled,
    Completed { exit_code: i32 },
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Cancelled => 1,
            RunOutcome::Completed { exit_code } => *exit_code,
        }
    }
}

pub struct SessionController<S, C, W> {
    paths: SessionPaths,
    task: TaskCommand,
    selector: S,
    clock: C,
    console: W,
    phase: SessionPhase,
}

impl<S, C, W> SessionController<S, C, W>
where
    S: Selector,
    C: Clock,
    W: Write,
{
    pub fn new(paths: SessionPaths, task: TaskCommand, selector: S, clock: C, console: W) -> Self {
        Self {
            paths,
            task,
            selector,
            clock,
            console,
            phase: SessionPhase::Idle,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn into_console(self) -> W {
        self.console
    }

    fn enter(&mut self, phase: SessionPhase) {
        log::debug!("session: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    pub fn run_session(&mut self, candidates: &[String]) -> Result<RunOutcome, SessionError> {
        self.enter(SessionPhase::AwaitingSelection);
        let value = match self.selector.choose(candidates).map_err(SessionError::Prompt)? {
            Selection::Chosen(v) if !v.is_empty() => v,
            _ => {
                self.enter(SessionPhase::Cancelled);
                return Ok(RunOutcome::Cancelled);
            }
        };

        self.enter(SessionPhase::Provisioning);
        let descriptor = provision(&self.paths, self.clock.now(), &value)?;
        write_descriptor(&self.paths.descriptor_path(), &descriptor)?;

        self.enter(SessionPhase::Spawning);
        let mut task = RunningTask::spawn(&self.task)?;
        log::debug!("task pid {}", task.id());

        self.enter(SessionPhase::Streaming);
        let log_path = descriptor.log_directory.join(OUTPUT_LOG_NAME);
        let lines = task.stream(&mut self.console, &log_path)?;
        log::debug!("output closed after {lines} line(s)");

        self.enter(SessionPhase::Waiting);
        let exit_code = task.wait()?;
        self.enter(SessionPhase::Done(exit_code));
        log::info!("task exited with {exit_code}");
        Ok(RunOutcome::Completed { exit_code })
    }
}
