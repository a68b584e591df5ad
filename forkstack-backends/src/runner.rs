//! Subprocess seam for provider CLIs.
//!
//! Every backend talks to its provider through a [`CommandRunner`]. The
//! production runner is [`SystemRunner`] (blocking `std::process::Command`);
//! [`ScriptedRunner`] replays canned outputs and records what was asked.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::BackendError;

// ---------------------------------------------------------------------------
// Invocation / output
// ---------------------------------------------------------------------------

/// One CLI call: program, arguments, optional stdin payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Written to the child's stdin; never included in `Display`.
    pub stdin: Option<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append `flag value` when `value` is present.
    pub fn opt(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.arg(flag).arg(v),
            None => self,
        }
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// `program` followed by every argument.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<&str> = self.tokens().collect();
        write!(f, "{}", tokens.join(" "))
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    fn status_label(&self) -> String {
        match self.status {
            Some(code) => format!("exit {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Runner trait
// ---------------------------------------------------------------------------

/// Executes a CLI invocation to completion.
///
/// Only failure to *start* the program is an `Err`; a non-zero exit is an
/// `Ok` output for [`run_checked`] to classify.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, BackendError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, BackendError> {
        (**self).run(invocation)
    }
}

/// Runs real processes, inheriting the current environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, BackendError> {
        tracing::debug!("running: {}", invocation);
        let unreachable = |source: std::io::Error| BackendError::Unreachable {
            program: invocation.program.clone(),
            source,
        };

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(unreachable)?;

        if let Some(input) = &invocation.stdin {
            if let Some(mut pipe) = child.stdin.take() {
                // A child that exits without reading stdin is reported via its status.
                if let Err(e) = pipe.write_all(input.as_bytes()) {
                    if e.kind() != std::io::ErrorKind::BrokenPipe {
                        return Err(unreachable(e));
                    }
                }
            }
        }

        let output = child.wait_with_output().map_err(unreachable)?;
        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Checked execution
// ---------------------------------------------------------------------------

const NOT_FOUND_MARKERS: &[&str] = &[
    "not found",
    "does not exist",
    "could not find",
    "nosuchbucket",
    "no such",
];

const DENIED_MARKERS: &[&str] = &[
    "unauthorized",
    "forbidden",
    "permission denied",
    "access denied",
    "accessdenied",
    "not logged in",
    "not authenticated",
    "invalid token",
];

/// Run `invocation` and return stdout, mapping a non-zero exit onto
/// [`BackendError`]. `what` names the resource for `NotFound`.
pub fn run_checked<R: CommandRunner + ?Sized>(
    runner: &R,
    invocation: &Invocation,
    what: &str,
) -> Result<String, BackendError> {
    let output = runner.run(invocation)?;
    if output.success() {
        return Ok(output.stdout);
    }
    let err = classify_failure(&invocation.program, what, &output);
    tracing::debug!("{} -> {}", invocation, err);
    Err(err)
}

/// Map a failed process onto the closest [`BackendError`] variant.
pub fn classify_failure(program: &str, what: &str, output: &CommandOutput) -> BackendError {
    let message = if output.stderr.trim().is_empty() {
        output.stdout.trim().to_string()
    } else {
        output.stderr.trim().to_string()
    };
    let lowered = message.to_lowercase();

    if DENIED_MARKERS.iter().any(|m| lowered.contains(m)) {
        return BackendError::PermissionDenied {
            program: program.to_string(),
            message,
        };
    }
    if NOT_FOUND_MARKERS.iter().any(|m| lowered.contains(m)) {
        return BackendError::NotFound {
            what: what.to_string(),
        };
    }
    BackendError::CommandFailed {
        program: program.to_string(),
        status: output.status_label(),
        stderr: message,
    }
}

// ---------------------------------------------------------------------------
// ScriptedRunner
// ---------------------------------------------------------------------------

enum Reply {
    Output(CommandOutput),
    Missing,
}

/// In-process runner that answers from a script and records every call.
///
/// Rules match on a token prefix (`["turso", "db", "list"]`); the most
/// recently added matching rule wins. Unmatched calls succeed with empty
/// output.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: RefCell<Vec<(Vec<String>, Reply)>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer invocations starting with `prefix` with `output`.
    pub fn on(&self, prefix: &[&str], output: CommandOutput) -> &Self {
        self.rules.borrow_mut().push((
            prefix.iter().map(|s| s.to_string()).collect(),
            Reply::Output(output),
        ));
        self
    }

    /// Make `program` fail to start, as if it were not installed.
    pub fn missing(&self, program: &str) -> &Self {
        self.rules
            .borrow_mut()
            .push((vec![program.to_string()], Reply::Missing));
        self
    }

    /// Every invocation seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Calls rendered with `Display`, for compact assertions.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput, BackendError> {
        self.calls.borrow_mut().push(invocation.clone());
        let tokens: Vec<&str> = invocation.tokens().collect();
        let rules = self.rules.borrow();
        let reply = rules.iter().rev().find(|(prefix, _)| {
            prefix.len() <= tokens.len() && prefix.iter().zip(&tokens).all(|(p, t)| p == t)
        });
        match reply {
            Some((_, Reply::Output(output))) => Ok(output.clone()),
            Some((_, Reply::Missing)) => Err(BackendError::Unreachable {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted: not installed"),
            }),
            None => Ok(CommandOutput::ok("")),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
