//! Simulated deploy with automatic retry.
//!
//! The simulator never talks to an org. A component fails iff its name
//! contains `fail` (case-insensitive); that is the entire fault model.
//!
//! # Attempts
//!
//! A deploy makes at most [`MAX_DEPLOY_ATTEMPTS`] attempts:
//!
//! ```text
//! Running ──no failures──────────────────▶ Succeeded          (1 attempt)
//!    │
//!    ├──failures, auto_retry off─────────▶ Failed             (1 attempt)
//!    │
//!    └──failures, auto_retry on──▶ Retrying ──▶ SucceededWithRetry (2 attempts)
//! ```
//!
//! The retry runs against every resolved component except the failing ones,
//! so it cannot fail again and there is never a third attempt. Raising the
//! ceiling later only adds transitions; callers matching on [`DeployStatus`]
//! are unaffected.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::manifest::{parse_manifest_file, SENTINEL_COMPONENT};
use crate::util::fs::{write_string, FileSystem};

/// Substring that marks a component as failing.
pub const FAILURE_MARKER: &str = "fail";

/// Initial attempt plus one automatic retry.
pub const MAX_DEPLOY_ATTEMPTS: u32 = 2;

/// Which tests run alongside the deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TestLevel {
    #[default]
    NoTestRun,
    RunSpecifiedTests,
    RunLocalTests,
    RunAllTestsInOrg,
}

impl TestLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            TestLevel::NoTestRun => "NoTestRun",
            TestLevel::RunSpecifiedTests => "RunSpecifiedTests",
            TestLevel::RunLocalTests => "RunLocalTests",
            TestLevel::RunAllTestsInOrg => "RunAllTestsInOrg",
        }
    }
}

impl fmt::Display for TestLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a test level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid test level '{0}', valid values: NoTestRun, RunSpecifiedTests, RunLocalTests, RunAllTestsInOrg"
)]
pub struct TestLevelParseError(pub String);

impl FromStr for TestLevel {
    type Err = TestLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "notestrun" => Ok(TestLevel::NoTestRun),
            "runspecifiedtests" => Ok(TestLevel::RunSpecifiedTests),
            "runlocaltests" => Ok(TestLevel::RunLocalTests),
            "runalltestsinorg" => Ok(TestLevel::RunAllTestsInOrg),
            _ => Err(TestLevelParseError(s.to_string())),
        }
    }
}

/// Options for a simulated deploy.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Manifest to read components from
    pub manifest_path: Option<PathBuf>,

    /// Explicit components; when non-empty the manifest is not read
    pub components: Vec<String>,

    /// Test level
    pub test_level: TestLevel,

    /// Explicit test names
    pub run_tests: Vec<String>,

    /// Validate only
    pub check_only: bool,

    /// Retry once without the failing components
    pub auto_retry: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        DeployOptions {
            manifest_path: None,
            components: Vec::new(),
            test_level: TestLevel::default(),
            run_tests: Vec::new(),
            check_only: false,
            auto_retry: true,
        }
    }
}

/// Terminal state of a deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployStatus {
    Succeeded,
    Failed,
    SucceededWithRetry,
}

impl DeployStatus {
    pub fn is_success(self) -> bool {
        !matches!(self, DeployStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeployStatus::Succeeded => "Succeeded",
            DeployStatus::Failed => "Failed",
            DeployStatus::SucceededWithRetry => "SucceededWithRetry",
        }
    }
}

impl fmt::Display for DeployStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a simulated deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    pub status: DeployStatus,

    /// 1, or 2 when a retry ran
    pub attempts: u32,

    /// Distinct components that failed the first attempt, first occurrence
    /// order
    pub failed_components: Vec<String>,

    /// Components sent in the retry; empty unless one ran
    pub retried_components: Vec<String>,

    /// Every component resolved for the first attempt
    pub manifest_components: Vec<String>,

    pub log_path: PathBuf,
}

#[derive(Debug)]
enum DeployState {
    Running,
    Retrying,
    Finished(DeployStatus),
}

/// Whether the simulator treats `component` as failing.
pub fn is_failing(component: &str) -> bool {
    component.to_lowercase().contains(FAILURE_MARKER)
}

/// Components a deploy covers: the explicit list, else the manifest members.
///
/// No manifest, a missing one, or one without members all resolve to the
/// single sentinel component.
pub fn resolve_components(fs: &dyn FileSystem, opts: &DeployOptions) -> Result<Vec<String>> {
    if !opts.components.is_empty() {
        return Ok(opts.components.clone());
    }

    match &opts.manifest_path {
        Some(path) => parse_manifest_file(fs, path),
        None => Ok(vec![SENTINEL_COMPONENT.to_string()]),
    }
}

/// Run a simulated deploy and write its log to `log_path`.
///
/// A failing component is reported through [`DeployStatus`], never as an
/// error. Errors are I/O only: reading the manifest or writing the log.
pub fn simulate_deploy(
    fs: &dyn FileSystem,
    log_path: &Path,
    opts: &DeployOptions,
) -> Result<DeployResult> {
    let components = resolve_components(fs, opts)?;
    let mut seen = HashSet::new();
    let failed: Vec<String> = components
        .iter()
        .map(String::as_str)
        .filter(|c| is_failing(c) && seen.insert(*c))
        .map(str::to_string)
        .collect();

    let mut log = vec![
        format!(
            "Deploy requested at {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        format!(
            "Manifest: {}",
            opts.manifest_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "not provided".to_string())
        ),
        format_test_level(opts.test_level, &opts.run_tests),
        format!("CheckOnly: {}", opts.check_only),
        format!("Components: {}", components.join(", ")),
    ];

    let mut attempts = 1;
    let mut retried = Vec::new();
    let mut state = DeployState::Running;

    let status = loop {
        tracing::debug!("deploy attempt {}: {:?}", attempts, state);
        state = match state {
            DeployState::Running => {
                if failed.is_empty() {
                    DeployState::Finished(DeployStatus::Succeeded)
                } else {
                    log.push(format!("Failed components: {}", failed.join(", ")));
                    if opts.auto_retry && attempts < MAX_DEPLOY_ATTEMPTS {
                        DeployState::Retrying
                    } else {
                        DeployState::Finished(DeployStatus::Failed)
                    }
                }
            }
            DeployState::Retrying => {
                attempts += 1;
                retried = components
                    .iter()
                    .filter(|c| !is_failing(c))
                    .cloned()
                    .collect();
                log.push("Auto-retry enabled: retrying without failing components...".to_string());
                log.push(format!("Retry components: {}", retried.join(", ")));
                // The retry set has no failing components left.
                DeployState::Finished(DeployStatus::SucceededWithRetry)
            }
            DeployState::Finished(status) => break status,
        };
    };

    write_string(fs, log_path, &log.join("\n"))?;

    if status.is_success() {
        tracing::info!(
            "deploy {} after {} attempt(s), {} components",
            status,
            attempts,
            components.len()
        );
    } else {
        tracing::warn!("deploy failed: {}", failed.join(", "));
    }

    Ok(DeployResult {
        status,
        attempts,
        failed_components: failed,
        retried_components: retried,
        manifest_components: components,
        log_path: log_path.to_path_buf(),
    })
}

fn format_test_level(level: TestLevel, run_tests: &[String]) -> String {
    if run_tests.is_empty() {
        format!("TestLevel: {}", level)
    } else {
        format!("TestLevel: {} ({})", level, run_tests.join(","))
    }
}
