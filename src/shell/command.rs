//! Structured command execution.
//!
//! Commands are described by [`CommandSpec`], an executable plus an argument
//! list, and never pass through a shell, so there is no interpolation of
//! untrusted strings into command lines.

use crate::error::{KitbagError, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// An executable with its argument list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,

    /// Arguments, passed verbatim.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Prefix this command with a privilege-escalation wrapper.
    pub fn with_sudo(self) -> Self {
        let mut args = vec![self.program];
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
        }
    }

    /// Append additional arguments.
    pub fn with_args<I: IntoIterator<Item = S>, S: Into<String>>(mut self, extra: I) -> Self {
        self.args.extend(extra.into_iter().map(Into::into));
        self
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or timeout).
    pub exit_code: Option<i32>,

    /// Standard output (empty when not captured).
    pub stdout: String,

    /// Standard error (empty when not captured).
    pub stderr: String,

    /// Whether the command exceeded its deadline and was killed.
    pub timed_out: bool,

    /// Whether the command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Combined stdout and stderr, in that order.
    ///
    /// The connectivity probe matches a marker against this, since ssh
    /// writes its banner to stderr.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.clone();
        out.push_str(&self.stderr);
        out
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,

    /// Deadline after which the process is killed.
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    /// Capture both output streams.
    pub fn captured() -> Self {
        Self {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }

    /// Capture both streams and enforce a deadline.
    pub fn captured_with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::captured()
        }
    }
}

/// Execute a command.
///
/// Failure to spawn is an error; a nonzero exit is reported through
/// [`CommandResult::success`], since some callers (the connectivity probe)
/// decide success on output content rather than exit status.
pub fn execute(spec: &CommandSpec, options: &CommandOptions) -> Result<CommandResult> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(if options.capture_stdout {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });
    cmd.stderr(if options.capture_stderr {
        Stdio::piped()
    } else {
        Stdio::inherit()
    });

    let mut child = cmd.spawn().map_err(|_| KitbagError::CommandFailed {
        command: spec.to_string(),
        code: None,
    })?;

    let stdout_handle = child.stdout.take().map(spawn_reader);
    let stderr_handle = child.stderr.take().map(spawn_reader);

    let status = match options.timeout {
        Some(timeout) => wait_with_deadline(&mut child, timeout)?,
        None => Some(child.wait()?),
    };

    let stdout = join_reader(stdout_handle);
    let stderr = join_reader(stderr_handle);

    match status {
        Some(status) => Ok(CommandResult {
            exit_code: status.code(),
            stdout,
            stderr,
            timed_out: false,
            success: status.success(),
        }),
        None => Ok(CommandResult {
            exit_code: None,
            stdout,
            stderr,
            timed_out: true,
            success: false,
        }),
    }
}

/// Execute a command and return success/failure, capturing output silently.
pub fn command_succeeds(program: &str, args: &[&str]) -> bool {
    execute(&CommandSpec::new(program, args), &CommandOptions::captured())
        .map(|r| r.success)
        .unwrap_or(false)
}

/// Execute a command and return its stdout on success.
pub fn command_output(program: &str, args: &[&str]) -> Option<String> {
    execute(&CommandSpec::new(program, args), &CommandOptions::captured())
        .ok()
        .filter(|r| r.success)
        .map(|r| r.stdout)
}

fn spawn_reader<R: Read + Send + 'static>(stream: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
        }
        output
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default()
}

/// Wait for the child until the deadline. Returns `None` if the deadline
/// passed and the child was killed.
fn wait_with_deadline(
    child: &mut std::process::Child,
    timeout: Duration,
) -> Result<Option<std::process::ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(Duration::from_millis(50));
    }
}
