use std::process::Command;

use anyhow::{Context, Result, bail};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  pub status: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool { self.status == Some(0) }
}

/// Runs one external program to completion and captures what it printed.
///
/// `env` entries are applied to that single invocation only.
pub trait CommandRunner {
  fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput>;
}

/// What to do when a subprocess exits with a nonzero status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
  #[default]
  Continue,
  Abort,
}

impl FailurePolicy {
  pub fn from_strict(strict: bool) -> Self {
    if strict { Self::Abort } else { Self::Continue }
  }

  pub fn check(self, command_line: &str, output: &CommandOutput) -> Result<()> {
    if self == Self::Abort && !output.success() {
      let status = output
        .status
        .map(|code| code.to_string())
        .unwrap_or_else(|| "signal".to_string());

      bail!(
        "Command '{}' failed with status {}: {}",
        command_line,
        status,
        output.stderr.trim()
      );
    }

    Ok(())
  }
}

pub fn describe(program: &str, args: &[&str], env: &[(&str, &str)]) -> String {
  let mut parts = env
    .iter()
    .map(|(key, value)| format!("{key}=\"{value}\""))
    .collect::<Vec<_>>();

  parts.push(program.to_string());
  parts.extend(args.iter().map(|arg| {
    if arg.contains(' ') {
      format!("\"{arg}\"")
    } else {
      arg.to_string()
    }
  }));

  parts.join(" ")
}

#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
  base_env: Vec<(String, String)>,
}

impl SystemRunner {
  pub fn new() -> Self { Self::default() }

  pub fn with_env<K: Into<String>, V: Into<String>>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self {
    self
      .base_env
      .extend(vars.into_iter().map(|(key, value)| (key.into(), value.into())));
    self
  }
}

impl CommandRunner for SystemRunner {
  fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
    let mut command = Command::new(program);
    command.args(args);

    for (key, value) in &self.base_env {
      command.env(key, value);
    }

    for (key, value) in env {
      command.env(key, value);
    }

    let output = command
      .output()
      .with_context(|| format!("Cannot run {}", describe(program, args, env)))?;

    Ok(CommandOutput {
      status: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).to_string(),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
  }
}
