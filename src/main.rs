use std::collections::HashMap;

use anyhow::Result;
use clap::Parser;
use vcs_fixture::{
  cli::{Args, Command},
  config::{ConfigOverrides, EffectiveConfig, load_file},
  fixture::execute_build,
  verify::execute_verify,
};

fn main() -> Result<()> {
  let args = match Args::try_parse() {
    Ok(opts) => opts,
    Err(e) => {
      match e.kind() {
        clap::error::ErrorKind::DisplayVersion => {
          println!("{}", env!("CARGO_PKG_VERSION"));
          return Ok(());
        }
        _ => {
          e.exit();
        }
      }
    }
  };

  let file_cfg = load_file(args.config.as_deref())?;
  let verbose = args.verbose.then_some(true);
  let command = args.into_command();

  let overrides = match &command {
    Command::Build(build) => {
      ConfigOverrides {
        target_dir: build.target.clone(),
        tool: build.tool.clone(),
        strict: build.strict.then_some(true),
        verbose,
      }
    }
    Command::Verify(verify) => {
      ConfigOverrides {
        target_dir: verify.target.clone(),
        verbose,
        ..ConfigOverrides::default()
      }
    }
  };

  let config = EffectiveConfig::from_sources(file_cfg, &HashMap::from_iter(std::env::vars()), overrides);

  if config.verbose {
    eprintln!("Configuration loaded for command '{}'.", command.name());
  }

  match &command {
    Command::Build(_) => execute_build(&config)?,
    Command::Verify(verify_args) => execute_verify(verify_args, &config)?,
  }

  Ok(())
}
