use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(clap::Args, Debug, Default)]
pub struct BuildArgs {
  /// Directory to create the fixture repository in. It must not exist yet.
  #[arg(long, short = 't', value_name = "DIR")]
  pub target: Option<PathBuf>,

  /// Version control program to invoke.
  #[arg(long, value_name = "PROGRAM")]
  pub tool: Option<String>,

  /// Abort as soon as a subprocess exits with a nonzero status.
  #[arg(long, short = 's')]
  pub strict: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct VerifyArgs {
  /// Fixture repository to inspect.
  #[arg(long, short = 't', value_name = "DIR")]
  pub target: Option<PathBuf>,

  /// Print the report as JSON.
  #[arg(long, short = 'j')]
  pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create the fixture repository and print its commit identifiers (default).
  #[command(alias = "b")]
  Build(BuildArgs),
  /// Check an existing fixture repository and print a summary of it.
  #[command(alias = "v")]
  Verify(VerifyArgs),
}

impl Command {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Build(_) => "build",
      Self::Verify(_) => "verify",
    }
  }
}

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
  /// Optional explicit config file path.
  #[arg(long, short = 'c', global = true)]
  pub config: Option<PathBuf>,

  /// Enable verbose output.
  #[arg(long, short, global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Option<Command>,
}

impl Args {
  pub fn into_command(self) -> Command { self.command.unwrap_or_else(|| Command::Build(BuildArgs::default())) }
}
