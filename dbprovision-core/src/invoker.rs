//! Provisioning invoker: read the password, validate it, run the cloud CLI.
//!
//! The invoker moves through `AwaitingInput` → `Invoking` → `Succeeded` or
//! `Failed` exactly once. There is no retry; a non-zero exit from the cloud
//! CLI is reported as-is and the child's output streams pass straight
//! through to the operator.

use crate::config::ProvisionConfig;
use crate::error::{EXIT_FAILURE, ProvisionError, Result};
use crate::request::ProvisionRequest;
use crate::security::{MasterPassword, PasswordSource};
use std::process::{Command, ExitStatus};
use tracing::{debug, error, info, warn};

/// How the external program finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exited normally with this status code
    Exited(i32),
    /// Terminated by this signal number (Unix only)
    Signaled(i32),
    /// Finished without a code or signal the platform could report
    Unknown,
}

impl ExitOutcome {
    /// Converts a child's exit status.
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }

        Self::Unknown
    }

    /// Exit status the invoker should return for this outcome.
    ///
    /// Signals map to `128 + signal`, matching shell convention.
    pub fn code(&self) -> i32 {
        match *self {
            Self::Exited(code) => code,
            Self::Signaled(signal) => 128_i32.saturating_add(signal),
            Self::Unknown => EXIT_FAILURE,
        }
    }

    /// True when the program exited with status 0.
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

/// Seam for launching the external program.
pub trait CommandRunner {
    /// Runs `program` with `args` to completion and reports how it exited.
    ///
    /// # Errors
    /// Returns [`ProvisionError::Launch`] if the program cannot be started.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExitOutcome>;
}

/// Runs programs as blocking child processes that inherit stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a system runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExitOutcome> {
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| ProvisionError::launch_failed(program, e))?;
        Ok(ExitOutcome::from_status(status))
    }
}

/// Lifecycle of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokerState {
    /// Waiting for the password
    AwaitingInput,
    /// The cloud CLI is running
    Invoking,
    /// The cloud CLI exited 0, or a dry run completed
    Succeeded,
    /// Validation, launch, or the cloud CLI failed
    Failed,
}

impl InvokerState {
    /// True for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// The cloud CLI ran and finished
    Completed(ExitOutcome),
    /// Nothing was launched; carries the redacted command line
    DryRun { command_line: String },
}

impl InvocationOutcome {
    /// Exit status for the invoker process.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed(outcome) => outcome.code(),
            Self::DryRun { .. } => 0,
        }
    }
}

/// Maps the result of [`Invoker::run`] to the process exit status.
pub fn exit_code_for(result: &Result<InvocationOutcome>) -> i32 {
    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => e.exit_code(),
    }
}

/// Drives one provisioning attempt.
#[derive(Debug)]
pub struct Invoker<R> {
    config: ProvisionConfig,
    runner: R,
    dry_run: bool,
    state: InvokerState,
}

impl<R: CommandRunner> Invoker<R> {
    /// Creates an invoker in the `AwaitingInput` state.
    pub fn new(config: ProvisionConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            dry_run: false,
            state: InvokerState::AwaitingInput,
        }
    }

    /// Builder method to stop after validation instead of launching.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> InvokerState {
        self.state
    }

    /// The runner used to launch the cloud CLI.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Reads the password from `source` and runs the cloud CLI once.
    ///
    /// A non-zero exit from the cloud CLI is returned as
    /// `Ok(InvocationOutcome::Completed(..))`, not as an error.
    ///
    /// # Errors
    /// - [`ProvisionError::Configuration`] if the config is invalid (checked
    ///   before the prompt) or the invoker already ran
    /// - [`ProvisionError::Input`] if the password cannot be read
    /// - [`ProvisionError::Validation`] if the password is too short
    /// - [`ProvisionError::Launch`] if the cloud CLI cannot be started
    pub fn run(&mut self, source: &mut dyn PasswordSource) -> Result<InvocationOutcome> {
        if self.state != InvokerState::AwaitingInput {
            return Err(ProvisionError::configuration(
                "invoker has already run; create a new one to provision again",
            ));
        }

        let result = self.execute(source);
        self.state = match &result {
            Ok(InvocationOutcome::Completed(outcome)) if outcome.success() => {
                InvokerState::Succeeded
            }
            Ok(InvocationOutcome::DryRun { .. }) => InvokerState::Succeeded,
            Ok(InvocationOutcome::Completed(_)) | Err(_) => InvokerState::Failed,
        };
        result
    }

    fn execute(&mut self, source: &mut dyn PasswordSource) -> Result<InvocationOutcome> {
        self.config.validate()?;

        let raw = source.read_password()?;
        let password = MasterPassword::parse(raw).map_err(|e| {
            warn!("Master password rejected by length check");
            e
        })?;
        debug!("Master password accepted ({} characters)", password.char_len());

        let request = ProvisionRequest::new(self.config.clone(), password)?;
        let config = request.config();
        info!(
            "Provisioning cluster '{}' ({} {}) in {} with profile '{}'",
            config.cluster_identifier,
            config.engine,
            config.engine_version,
            config.availability_zone,
            config.profile
        );
        debug!("Command: {}", request.redacted_command_line());

        if self.dry_run {
            info!("Dry run requested, not launching {}", request.program());
            return Ok(InvocationOutcome::DryRun {
                command_line: request.redacted_command_line(),
            });
        }

        self.state = InvokerState::Invoking;
        let outcome = self
            .runner
            .run(request.program(), &request.args())
            .map_err(|e| {
                error!("{}", e);
                e
            })?;

        match outcome {
            ExitOutcome::Exited(0) => info!("✓ {} exited successfully", request.program()),
            ExitOutcome::Exited(code) => warn!("{} exited with status {}", request.program(), code),
            ExitOutcome::Signaled(signal) => {
                warn!("{} terminated by signal {}", request.program(), signal);
            }
            ExitOutcome::Unknown => warn!("{} exited without a status code", request.program()),
        }

        Ok(InvocationOutcome::Completed(outcome))
    }
}
