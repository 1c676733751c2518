use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, FixedOffset};
use git2::{Repository, Time};
use serde::Serialize;

use crate::{
  cli::VerifyArgs,
  config::EffectiveConfig,
  fixture::{FixtureSpec, parse_date},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureReport {
  pub path: String,
  pub commit_id: String,
  pub message: String,
  pub author_time: String,
  pub committer_time: String,
  pub files: Vec<String>,
}

fn to_datetime(time: Time) -> Result<DateTime<FixedOffset>> {
  let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
    .ok_or_else(|| anyhow!("Invalid UTC offset of {} minutes", time.offset_minutes()))?;

  DateTime::from_timestamp(time.seconds(), 0)
    .map(|utc| utc.with_timezone(&offset))
    .ok_or_else(|| anyhow!("Invalid commit timestamp {}", time.seconds()))
}

fn check_time(role: &str, actual: DateTime<FixedOffset>, expected: &DateTime<FixedOffset>) -> Result<()> {
  // DateTime equality ignores the offset, git does not.
  if actual != *expected || actual.offset() != expected.offset() {
    bail!(
      "{} date is {}, expected {}",
      role,
      actual.to_rfc2822(),
      expected.to_rfc2822()
    );
  }

  Ok(())
}

/// Opens an existing fixture repository and checks it matches what the builder produces.
pub fn verify_fixture(spec: &FixtureSpec) -> Result<FixtureReport> {
  let expected_time = parse_date(&spec.date)?;
  let path = &spec.target_dir;

  let repo = Repository::open(path).with_context(|| format!("Cannot open git repository at {}", path.display()))?;

  let head = repo
    .head()
    .context("Cannot read git HEAD")?
    .peel_to_commit()
    .context("HEAD does not resolve to a commit")?;

  let mut revwalk = repo.revwalk().context("Cannot create git revwalk")?;
  revwalk.push(head.id()).context("Cannot push HEAD into revwalk")?;

  let history = revwalk
    .collect::<std::result::Result<Vec<_>, _>>()
    .context("Failed iterating git history")?;

  if history.len() != 1 {
    bail!("Expected exactly one commit, found {}", history.len());
  }

  let message = head.message().unwrap_or_default().trim_end_matches('\n').to_string();
  if message != spec.message {
    bail!("Commit message is '{}', expected '{}'", message, spec.message);
  }

  let author_time = to_datetime(head.author().when())?;
  let committer_time = to_datetime(head.committer().when())?;
  check_time("Author", author_time, &expected_time)?;
  check_time("Committer", committer_time, &expected_time)?;

  let tree = head.tree().context("Cannot read HEAD tree")?;
  let files = tree
    .iter()
    .filter_map(|entry| entry.name().map(ToOwned::to_owned))
    .collect::<Vec<_>>();

  if files != [spec.file_name.clone()] {
    bail!("Fixture tree contains {:?}, expected only {}", files, spec.file_name);
  }

  let entry = tree
    .get_name(&spec.file_name)
    .ok_or_else(|| anyhow!("Cannot find {} in HEAD tree", spec.file_name))?;
  let blob = repo
    .find_blob(entry.id())
    .context(format!("Cannot read blob for {}", spec.file_name))?;

  let content = String::from_utf8_lossy(blob.content());
  let expected_content = format!("{}\n", spec.file_content);
  if content != expected_content {
    bail!("{} contains {:?}, expected {:?}", spec.file_name, content, expected_content);
  }

  Ok(FixtureReport {
    path: path.display().to_string(),
    commit_id: head.id().to_string(),
    message,
    author_time: author_time.to_rfc2822(),
    committer_time: committer_time.to_rfc2822(),
    files,
  })
}

pub fn render_report(report: &FixtureReport) -> String {
  format!(
    "{}\n  commit:    {}\n  message:   {}\n  author:    {}\n  committer: {}\n  files:     {}\n",
    report.path,
    report.commit_id,
    report.message,
    report.author_time,
    report.committer_time,
    report.files.join(", ")
  )
}

pub fn execute_verify(args: &VerifyArgs, config: &EffectiveConfig) -> Result<()> {
  let report = verify_fixture(&config.fixture_spec())?;

  if args.json {
    println!(
      "{}",
      serde_json::to_string_pretty(&report).context("Cannot serialize fixture report")?
    );
  } else {
    print!("{}", render_report(&report));
  }

  Ok(())
}
