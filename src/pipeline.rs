//! End-to-end flow of one invocation: text, draft, validated command, then
//! either a dry-run preview or a single engine exchange.

use crate::cancel::CancelToken;
use crate::config::Settings;
use crate::confirm::confirm_destructive;
use crate::dispatcher::{Dispatcher, ProcessEngine};
use crate::engine::EngineLocator;
use crate::errors::CoreError;
use crate::format::format_dry_run;
use crate::fs::HostFs;
use crate::models::{ExecutionResult, RunFlags, ValidatedCommand};
use crate::parser::CommandParser;
use std::io::{BufRead, Write};
use tracing::info;

/// What an invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dry run: description only, the engine was never contacted.
    Preview(String),
    /// The engine ran and reported this result.
    Completed(ExecutionResult),
}

/// Parses and validates `text`, merging the run-time flags.
pub fn prepare<P>(parser: &P, text: &str, flags: RunFlags) -> crate::Result<ValidatedCommand>
where
    P: CommandParser + ?Sized,
{
    let draft = parser
        .parse(text)
        .ok_or_else(|| CoreError::parse_failure(text))?;
    Ok(ValidatedCommand::from_draft(draft, flags)?)
}

pub struct Pipeline<'a, H: HostFs> {
    host: &'a H,
    settings: &'a Settings,
    cancel: CancelToken,
}

impl<'a, H: HostFs> Pipeline<'a, H> {
    pub fn new(host: &'a H, settings: &'a Settings) -> Self {
        Self {
            host,
            settings,
            cancel: CancelToken::default(),
        }
    }

    /// Shares `cancel` with the confirmation prompt and the engine wait.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs a validated command. The engine is located before the user is
    /// asked to confirm, so a missing engine never costs a prompt.
    pub fn run<R, W>(&self, cmd: ValidatedCommand, input: R, output: W) -> crate::Result<Outcome>
    where
        R: BufRead,
        W: Write,
    {
        if cmd.dry_run {
            return Ok(Outcome::Preview(format_dry_run(&cmd)));
        }

        let program = EngineLocator::from_settings(self.host, self.settings).locate()?;

        if !confirm_destructive(self.host, &cmd, &self.cancel, input, output)? {
            return Err(CoreError::UserCancelled);
        }

        let engine = ProcessEngine::new(program)
            .with_timeout(self.settings.engine_timeout)
            .with_cancel(self.cancel.clone());
        info!(action = %cmd.action, engine = %engine.program().display(), "executing command");
        Dispatcher::new(engine).execute(cmd).map(Outcome::Completed)
    }
}
