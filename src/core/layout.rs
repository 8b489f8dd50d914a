//! Per-project path layout.
//!
//! A project directory holds one workspace per side plus a deploy area:
//!
//! ```text
//! <project>/
//!   source/        force-app/, manifest/package.xml, logs/
//!   destination/   force-app/, manifest/package.xml, logs/
//!   deploy/        manifest/{delta-package.xml,destructiveChanges.xml}, logs/
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::fs::{ensure_dir, FileSystem};

/// Directory under a workspace root that holds component files.
pub const COMPONENT_DIR: &str = "force-app";

/// Paths used by the pipeline for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub deploy: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        ProjectLayout {
            source: root.join("source"),
            destination: root.join("destination"),
            deploy: root.join("deploy"),
            root,
        }
    }

    /// Manifest path for the given kind.
    pub fn manifest(&self, kind: ManifestKind) -> PathBuf {
        match kind {
            ManifestKind::Source => self.source.join("manifest").join("package.xml"),
            ManifestKind::Destination => self.destination.join("manifest").join("package.xml"),
            ManifestKind::Delta => self.deploy.join("manifest").join("delta-package.xml"),
        }
    }

    pub fn destructive_manifest(&self) -> PathBuf {
        self.deploy.join("manifest").join("destructiveChanges.xml")
    }

    pub fn comparison_log(&self) -> PathBuf {
        self.deploy.join("logs").join("comparison.csv")
    }

    pub fn deploy_log(&self) -> PathBuf {
        self.deploy.join("logs").join("deployment.log")
    }

    /// Workspace root for a retrieval target.
    pub fn workspace(&self, target: RetrieveTarget) -> &Path {
        match target {
            RetrieveTarget::Source => &self.source,
            RetrieveTarget::Destination => &self.destination,
        }
    }

    /// Create the project directories.
    ///
    /// This is the collaborator's job; the pipeline operations themselves
    /// only create what they write.
    pub fn ensure(&self, fs: &dyn FileSystem) -> Result<()> {
        for dir in [
            self.root.clone(),
            self.source.join("manifest"),
            self.destination.join("manifest"),
            self.deploy.join("manifest"),
            self.deploy.join("logs"),
        ] {
            ensure_dir(fs, &dir)?;
        }
        Ok(())
    }
}

/// Error parsing a manifest kind or retrieval target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutParseError {
    #[error("unsupported manifest type '{0}', valid values: source, destination, delta")]
    ManifestKind(String),

    #[error("unknown retrieve target '{0}', valid values: source, destination")]
    RetrieveTarget(String),
}

/// Which project manifest to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Source,
    Destination,
    Delta,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 3] = [
        ManifestKind::Source,
        ManifestKind::Destination,
        ManifestKind::Delta,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ManifestKind::Source => "source",
            ManifestKind::Destination => "destination",
            ManifestKind::Delta => "delta",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ManifestKind {
    type Err = LayoutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(ManifestKind::Source),
            "destination" => Ok(ManifestKind::Destination),
            "delta" => Ok(ManifestKind::Delta),
            _ => Err(LayoutParseError::ManifestKind(s.to_string())),
        }
    }
}

/// Which workspace a retrieval writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrieveTarget {
    Source,
    Destination,
}

impl RetrieveTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            RetrieveTarget::Source => "source",
            RetrieveTarget::Destination => "destination",
        }
    }
}

impl fmt::Display for RetrieveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetrieveTarget {
    type Err = LayoutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" => Ok(RetrieveTarget::Source),
            "destination" => Ok(RetrieveTarget::Destination),
            _ => Err(LayoutParseError::RetrieveTarget(s.to_string())),
        }
    }
}
