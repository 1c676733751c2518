use std::{
  env,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Changes the process working directory until dropped.
///
/// The previous directory is restored however the owning scope exits, including early
/// returns through `?` and unwinding panics. Callers sharing a process must not run
/// concurrently with each other while one of these is alive.
pub struct ScopedCwd {
  previous: PathBuf,
}

impl ScopedCwd {
  pub fn enter(path: &Path) -> Result<Self> {
    let previous = env::current_dir().context("Cannot read current working directory")?;
    env::set_current_dir(path).with_context(|| format!("Cannot change directory to {}", path.display()))?;

    Ok(Self { previous })
  }

  pub fn previous(&self) -> &Path { &self.previous }
}

impl Drop for ScopedCwd {
  fn drop(&mut self) {
    if let Err(error) = env::set_current_dir(&self.previous) {
      eprintln!(
        "Cannot restore working directory {}: {}",
        self.previous.display(),
        error
      );
    }
  }
}
