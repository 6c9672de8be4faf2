//! Command execution primitives with consistent error handling.

use std::process::{Command, Output, Stdio};

use crate::error::{EngineCommandFailedDetails, Error, Result};

/// Captured output from command execution.
/// Reusable primitive for any command that executes external processes.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new(stdout: String, stderr: String) -> Self {
        Self { stdout, stderr }
    }
}

/// Result of a finished child process.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub command: String,
    pub exit_code: i32,
    pub output: CapturedOutput,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Convert a non-zero exit into the shared engine failure details.
    pub fn failure_details(&self) -> EngineCommandFailedDetails {
        EngineCommandFailedDetails {
            command: self.command.clone(),
            exit_code: self.exit_code,
            stdout: self.output.stdout.clone(),
            stderr: self.output.stderr.clone(),
        }
    }
}

/// Render a program and its arguments as a single display string.
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command capturing stdout and stderr.
///
/// Only a failure to spawn is an error; a non-zero exit is reported through
/// the returned outcome so callers can pick their own error kind.
pub fn run_captured(program: &str, args: &[String]) -> Result<CommandOutcome> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::engine_spawn_failed(program, e.to_string()))?;

    Ok(CommandOutcome {
        command: display_command(program, args),
        exit_code: exit_code(&output),
        output: CapturedOutput::new(
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ),
    })
}

/// Run a command with inherited stdio so the user sees its progress.
pub fn run_inherited(program: &str, args: &[String]) -> Result<CommandOutcome> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::engine_spawn_failed(program, e.to_string()))?;

    Ok(CommandOutcome {
        command: display_command(program, args),
        exit_code: status.code().unwrap_or(-1),
        output: CapturedOutput::default(),
    })
}

fn exit_code(output: &Output) -> i32 {
    output.status.code().unwrap_or(-1)
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &CapturedOutput) -> &str {
    if !output.stderr.trim().is_empty() {
        output.stderr.trim()
    } else {
        output.stdout.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_captured_succeeds_with_valid_command() {
        let outcome = run_captured("echo", &["hello".to_string()]).unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.output.stdout, "hello");
        assert_eq!(outcome.command, "echo hello");
    }

    #[test]
    fn run_captured_reports_non_zero_exit() {
        let outcome = run_captured("false", &[]).unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.failure_details().exit_code, outcome.exit_code);
    }

    #[test]
    fn run_captured_fails_with_missing_program() {
        let err = run_captured("nonexistent_command_xyz", &[]).unwrap_err();
        assert_eq!(err.code.as_str(), "engine.spawn_failed");
    }

    #[test]
    fn error_text_prefers_stderr() {
        let output =
            CapturedOutput::new("stdout content".to_string(), "stderr content".to_string());
        assert_eq!(error_text(&output), "stderr content");
    }

    #[test]
    fn error_text_falls_back_to_stdout() {
        let output = CapturedOutput::new("stdout content".to_string(), String::new());
        assert_eq!(error_text(&output), "stdout content");
    }
}
