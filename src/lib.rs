//! metasync - metadata workspace comparison and simulated deploys
//!
//! This crate provides the core pipeline behind the `metasync` CLI:
//! diffing two component workspaces, synthesizing full, delta and
//! destructive package manifests, a simulated retrieval into a workspace and
//! a simulated deploy with one automatic retry.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for metasync unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides an in-memory filesystem and workspace fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{Change, ChangeStatus, ComponentType, ProjectLayout};
pub use ops::{ComparisonResult, DeployOptions, DeployResult, DeployStatus, RetrievalResult};
pub use util::context::GlobalContext;
