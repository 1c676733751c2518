#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap, path::Path, process::Command};

use anyhow::{Result, anyhow};
use tempfile::TempDir;
use vcs_fixture::{
  fixture::FixtureSpec,
  runner::{CommandOutput, CommandRunner, SystemRunner, describe},
};

pub const IDENTITY: [(&str, &str); 6] = [
  ("GIT_AUTHOR_NAME", "Tests"),
  ("GIT_AUTHOR_EMAIL", "tests@example.com"),
  ("GIT_COMMITTER_NAME", "Tests"),
  ("GIT_COMMITTER_EMAIL", "tests@example.com"),
  ("GIT_CONFIG_GLOBAL", "/dev/null"),
  ("GIT_CONFIG_NOSYSTEM", "1"),
];

pub const SAMPLE_ID: &str = "0b5b3d1c4f5e8a0b2d7c9e1f3a5b7c9d1e3f5a7b";

pub fn git(dir: &Path, args: &[&str]) -> String {
  let output = Command::new("git")
    .current_dir(dir)
    .envs(IDENTITY)
    .args(args)
    .output()
    .expect("failed to run git");

  assert!(
    output.status.success(),
    "git {:?} failed: {}",
    args,
    String::from_utf8_lossy(&output.stderr)
  );

  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn system_runner() -> SystemRunner { SystemRunner::new().with_env(IDENTITY) }

pub fn spec_in(temp: &TempDir) -> FixtureSpec {
  FixtureSpec {
    target_dir: temp.path().join("test-repos/git-repo"),
    ..FixtureSpec::default()
  }
}

pub fn ok(stdout: &str) -> CommandOutput {
  CommandOutput {
    status: Some(0),
    stdout: stdout.to_string(),
    stderr: String::new(),
  }
}

pub fn failed(stderr: &str) -> CommandOutput {
  CommandOutput {
    status: Some(128),
    stdout: String::new(),
    stderr: stderr.to_string(),
  }
}

pub fn sample_log(id: &str) -> String {
  format!(
    "commit {id}\nAuthor: Tests <tests@example.com>\nDate:   Sun Aug 10 15:00:00 2014 +0100\n\n    initial commit\n"
  )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
  pub program: String,
  pub args: Vec<String>,
  pub env: Vec<(String, String)>,
}

/// Records every invocation and answers with canned output keyed by the command line.
#[derive(Default)]
pub struct MockRunner {
  responses: HashMap<String, CommandOutput>,
  missing: Vec<String>,
  calls: RefCell<Vec<Call>>,
}

impl MockRunner {
  pub fn new() -> Self { Self::default() }

  pub fn respond(mut self, command_line: &str, output: CommandOutput) -> Self {
    self.responses.insert(command_line.to_string(), output);
    self
  }

  pub fn missing_program(mut self, program: &str) -> Self {
    self.missing.push(program.to_string());
    self
  }

  pub fn calls(&self) -> Vec<Call> { self.calls.borrow().clone() }

  pub fn command_lines(&self) -> Vec<String> {
    self
      .calls
      .borrow()
      .iter()
      .map(|call| {
        let args = call.args.iter().map(String::as_str).collect::<Vec<_>>();
        let env = call
          .env
          .iter()
          .map(|(key, value)| (key.as_str(), value.as_str()))
          .collect::<Vec<_>>();
        describe(&call.program, &args, &env)
      })
      .collect()
  }
}

impl CommandRunner for MockRunner {
  fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
    self.calls.borrow_mut().push(Call {
      program: program.to_string(),
      args: args.iter().map(ToString::to_string).collect(),
      env: env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
    });

    if self.missing.iter().any(|entry| entry == program) {
      return Err(anyhow!("No such file or directory: {program}"));
    }

    Ok(
      self
        .responses
        .get(&describe(program, args, env))
        .cloned()
        .unwrap_or_else(|| ok("")),
    )
  }
}
