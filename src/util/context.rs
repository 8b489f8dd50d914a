//! Global context for metasync operations.
//!
//! Provides centralized access to configuration, the project root and the
//! filesystem the operations run against.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::core::layout::ProjectLayout;
use crate::util::config::{global_config_dir, load_config, project_config_path, Config};
use crate::util::fs::{FileSystem, RealFs};

/// Global context containing configuration and paths.
#[derive(Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Project root the per-project layout hangs off
    project_root: PathBuf,

    /// Home directory for global metasync data (~/.metasync/)
    home: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Merged global + project configuration
    config: Config,

    /// Filesystem every operation reads and writes through
    fs: Arc<dyn FileSystem>,
}

impl std::fmt::Debug for GlobalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalContext")
            .field("cwd", &self.cwd)
            .field("project_root", &self.project_root)
            .field("home", &self.home)
            .field("verbose", &self.verbose)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_project(cwd.clone(), cwd))
    }

    /// Create a GlobalContext for an explicit project root.
    ///
    /// Relative roots are resolved against `cwd`.
    pub fn with_project(cwd: PathBuf, project_root: PathBuf) -> Self {
        let project_root = if project_root.is_absolute() {
            project_root
        } else {
            cwd.join(project_root)
        };

        let home = global_config_dir().unwrap_or_else(|| PathBuf::from(".metasync"));
        let config = load_config(
            &home.join("config.toml"),
            &project_config_path(&project_root),
        );

        GlobalContext {
            cwd,
            project_root,
            home,
            verbose: false,
            config,
            fs: Arc::new(RealFs),
        }
    }

    /// Swap the filesystem operations run against.
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Replace the loaded configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        project_config_path(&self.project_root)
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the filesystem.
    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Get the per-project path layout.
    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(&self.project_root)
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
