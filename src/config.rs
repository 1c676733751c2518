use std::{
  collections::HashMap,
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
  fixture::{DEFAULT_DATE, DEFAULT_TARGET_DIR, DEFAULT_TOOL, FixtureSpec},
  runner::FailurePolicy,
};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
  pub target_dir: Option<PathBuf>,
  pub tool: Option<String>,
  pub date: Option<String>,
  pub strict: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub target_dir: Option<PathBuf>,
  pub tool: Option<String>,
  pub strict: Option<bool>,
  pub verbose: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
  pub target_dir: PathBuf,
  pub tool: String,
  pub date: String,
  pub strict: bool,
  pub verbose: bool,
}

fn is_truthy(value: &str) -> bool { matches!(value, "1" | "true" | "yes") }

impl EffectiveConfig {
  pub fn from_sources(config: Option<FileConfig>, env: &HashMap<String, String>, flags: ConfigOverrides) -> Self {
    let config = config.unwrap_or_default();

    let env_var = |key: &str| env.get(key).cloned();

    let target_dir = flags
      .target_dir
      .or_else(|| env_var("VCS_FIXTURE_TARGET_DIR").map(PathBuf::from))
      .or(config.target_dir)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR));

    let tool = flags
      .tool
      .or_else(|| env_var("VCS_FIXTURE_TOOL"))
      .or(config.tool)
      .unwrap_or_else(|| DEFAULT_TOOL.to_string());

    let date = env_var("VCS_FIXTURE_DATE")
      .or(config.date)
      .unwrap_or_else(|| DEFAULT_DATE.to_string());

    let strict = flags
      .strict
      .or_else(|| env_var("VCS_FIXTURE_STRICT").map(|v| is_truthy(&v)))
      .or(config.strict)
      .unwrap_or(false);

    let verbose = flags
      .verbose
      .or_else(|| env_var("VCS_FIXTURE_VERBOSE").map(|v| is_truthy(&v)))
      .unwrap_or(false);

    Self {
      target_dir,
      tool,
      date,
      strict,
      verbose,
    }
  }

  pub fn fixture_spec(&self) -> FixtureSpec {
    FixtureSpec {
      target_dir: self.target_dir.clone(),
      tool: self.tool.clone(),
      date: self.date.clone(),
      ..FixtureSpec::default()
    }
  }

  pub fn failure_policy(&self) -> FailurePolicy { FailurePolicy::from_strict(self.strict) }
}

fn read_config(path: &Path) -> Result<FileConfig> {
  let content = fs::read_to_string(path).with_context(|| format!("Cannot read config file: {}", path.display()))?;
  serde_yaml::from_str::<FileConfig>(&content)
    .with_context(|| format!("Invalid YAML in config file: {}", path.display()))
}

pub fn load_file(config_path_override: Option<&Path>) -> Result<Option<FileConfig>> {
  if let Some(path) = config_path_override {
    return read_config(path).map(Some);
  }

  let global = if let Some(home) = std::env::var_os("HOME") {
    PathBuf::from(home).join(".config/vcs-fixture.yml")
  } else {
    PathBuf::from(".config/vcs-fixture.yml")
  };

  let local = PathBuf::from("vcs-fixture.yml");

  let mut result = if global.exists() {
    Some(read_config(&global)?)
  } else {
    None
  };

  if local.exists() {
    let overlay = read_config(&local)?;
    let mut merged = result.unwrap_or_default();

    merged.target_dir = overlay.target_dir.or(merged.target_dir);
    merged.tool = overlay.tool.or(merged.tool);
    merged.date = overlay.date.or(merged.date);
    merged.strict = overlay.strict.or(merged.strict);

    result = Some(merged);
  }

  Ok(result)
}
