//! Filesystem access.
//!
//! Every operation in [`crate::ops`] goes through the [`FileSystem`] trait so
//! callers decide where bytes actually live. [`RealFs`] is the disk-backed
//! implementation used by the CLI; tests use the in-memory filesystem from
//! `test_support`.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Minimal filesystem surface needed by the pipeline.
///
/// Implementations must create missing parent directories on [`write`] and
/// treat a missing root in [`walk_files`] as an empty tree.
///
/// [`write`]: FileSystem::write
/// [`walk_files`]: FileSystem::walk_files
pub trait FileSystem: Send + Sync {
    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the contents of a file, creating parent directories as needed.
    ///
    /// Readers never observe a partially written file.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Create a directory and all of its parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// All regular files beneath `root`, sorted by path. Symlinks are
    /// followed and reported under their link path.
    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Read a file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// The real, disk-backed filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Stage next to the destination so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(fs: &dyn FileSystem, path: &Path, contents: &str) -> Result<()> {
    fs.write(path, contents.as_bytes())
        .with_context(|| format!("failed to write file: {}", path.display()))
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(fs: &dyn FileSystem, path: &Path) -> Result<()> {
    if !fs.exists(path) {
        fs.create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
