//! High-level operations.
//!
//! Each operation takes the [`FileSystem`](crate::util::FileSystem) it runs
//! against plus plain inputs, and returns a plain result record for the
//! caller to persist or print.

pub mod compare;
pub mod delta;
pub mod deploy;
pub mod diff;
pub mod retrieve;

pub use compare::{compare, ComparisonResult};
pub use delta::{
    build_delta, build_destructive, generate_delta_manifest, generate_destructive_changes,
};
pub use deploy::{
    simulate_deploy, DeployOptions, DeployResult, DeployStatus, TestLevel, MAX_DEPLOY_ATTEMPTS,
};
pub use diff::{diff_workspaces, write_comparison_log};
pub use retrieve::{retrieve, RetrievalEntry, RetrievalResult};
