use std::{
  fs,
  io::{self, Write},
  path::PathBuf,
};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset};

use crate::{
  config::EffectiveConfig,
  history::extract_commit_ids,
  runner::{CommandOutput, CommandRunner, FailurePolicy, SystemRunner, describe},
  workdir::ScopedCwd,
};

pub const DEFAULT_TARGET_DIR: &str = "/tmp/test-repos/git-repo";
pub const DEFAULT_TOOL: &str = "git";
pub const DEFAULT_DATE: &str = "Sun Aug 10 15:00:00 2014 +0100";
pub const DEFAULT_MESSAGE: &str = "initial commit";
pub const DEFAULT_FILE_NAME: &str = "file1.txt";
pub const DEFAULT_FILE_CONTENT: &str = "abc";

pub const COMMITTER_DATE_ENV: &str = "GIT_COMMITTER_DATE";
pub const GIT_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

const SHELL: &str = "sh";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSpec {
  pub target_dir: PathBuf,
  pub tool: String,
  pub date: String,
  pub message: String,
  pub file_name: String,
  pub file_content: String,
}

impl Default for FixtureSpec {
  fn default() -> Self {
    Self {
      target_dir: PathBuf::from(DEFAULT_TARGET_DIR),
      tool: DEFAULT_TOOL.to_string(),
      date: DEFAULT_DATE.to_string(),
      message: DEFAULT_MESSAGE.to_string(),
      file_name: DEFAULT_FILE_NAME.to_string(),
      file_content: DEFAULT_FILE_CONTENT.to_string(),
    }
  }
}

pub fn parse_date(raw: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_str(raw, GIT_DATE_FORMAT).with_context(|| format!("Invalid commit date '{raw}'"))
}

pub struct FixtureBuilder<R> {
  runner: R,
  spec: FixtureSpec,
  policy: FailurePolicy,
  verbose: bool,
}

impl<R: CommandRunner> FixtureBuilder<R> {
  pub fn new(runner: R, spec: FixtureSpec) -> Self {
    Self {
      runner,
      spec,
      policy: FailurePolicy::default(),
      verbose: false,
    }
  }

  pub fn policy(mut self, policy: FailurePolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn verbose(mut self, verbose: bool) -> Self {
    self.verbose = verbose;
    self
  }

  pub fn spec(&self) -> &FixtureSpec { &self.spec }

  pub fn runner(&self) -> &R { &self.runner }

  /// Creates the fixture repository and returns the commit identifiers found in its log.
  ///
  /// Each step's captured stdout is echoed to `out` as it completes, followed by the
  /// identifiers one per line. Fails without touching the filesystem if the target
  /// directory already exists.
  pub fn build<W: Write>(&self, out: &mut W) -> Result<Vec<String>> {
    parse_date(&self.spec.date)?;

    let target = &self.spec.target_dir;
    if target.exists() {
      bail!("{} already exists", target.display());
    }

    fs::create_dir_all(target).with_context(|| format!("Cannot create directory {}", target.display()))?;

    let _cwd = ScopedCwd::enter(target)?;
    let tool = self.spec.tool.as_str();
    let date = self.spec.date.as_str();
    let message = self.spec.message.as_str();

    self.echo(out, &self.step(tool, &["init"], &[])?)?;

    let seed = format!("echo {} > {}", self.spec.file_content, self.spec.file_name);
    self.echo(out, &self.step(SHELL, &["-c", seed.as_str()], &[])?)?;

    self.echo(out, &self.step(tool, &["add", "."], &[])?)?;
    self.echo(out, &self.step(tool, &["commit", "-m", message], &[])?)?;
    self.echo(
      out,
      &self.step(
        tool,
        &["commit", "--amend", "--date", date, "-m", message],
        &[(COMMITTER_DATE_ENV, date)],
      )?,
    )?;

    let log = self.step(tool, &["log"], &[])?;
    let ids = extract_commit_ids(&log.stdout);

    for id in &ids {
      writeln!(out, "{id}").context("Cannot write commit identifier")?;
    }

    if self.verbose {
      eprintln!("Fixture ready at {} with {} commit(s).", target.display(), ids.len());
    }

    Ok(ids)
  }

  fn step(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
    let command_line = describe(program, args, env);

    if self.verbose {
      eprintln!("Running: {command_line}");
    }

    let output = self.runner.run(program, args, env)?;
    self.policy.check(&command_line, &output)?;

    if self.verbose && !output.success() {
      eprintln!("Command '{command_line}' exited with status {:?}, continuing.", output.status);
    }

    Ok(output)
  }

  fn echo<W: Write>(&self, out: &mut W, output: &CommandOutput) -> Result<()> {
    out.write_all(output.stdout.as_bytes()).context("Cannot write command output")?;

    if !output.stdout.ends_with('\n') {
      writeln!(out).context("Cannot write command output")?;
    }

    if !output.stderr.is_empty() {
      eprint!("{}", output.stderr);
    }

    Ok(())
  }
}

pub fn execute_build(config: &EffectiveConfig) -> Result<()> {
  let builder = FixtureBuilder::new(SystemRunner::new(), config.fixture_spec())
    .policy(config.failure_policy())
    .verbose(config.verbose);

  let stdout = io::stdout();
  let mut out = stdout.lock();
  builder.build(&mut out)?;
  out.flush().context("Cannot flush standard output")?;

  Ok(())
}
