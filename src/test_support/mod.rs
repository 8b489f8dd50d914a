//! Test utilities for metasync unit tests.
//!
//! Provides an in-memory [`FileSystem`] so the whole pipeline can run without
//! touching disk, plus fixtures for building component workspaces.
//!
//! # Example
//!
//! ```rust,ignore
//! use metasync::test_support::{MemoryFs, WorkspaceFixture};
//!
//! #[test]
//! fn test_example() {
//!     let fs = MemoryFs::new();
//!     WorkspaceFixture::new()
//!         .component("ApexClass/Foo.cls", "class Foo {}")
//!         .write_to(&fs, "/proj/source");
//!
//!     // Run operations against &fs...
//! }
//! ```

pub mod fixtures;

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::util::fs::FileSystem;

pub use fixtures::*;

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    read_only: Vec<PathBuf>,
}

impl MemoryState {
    fn add_dir(&mut self, path: &Path) {
        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }

    fn check_writable(&self, path: &Path) -> io::Result<()> {
        if self.read_only.iter().any(|ro| path.starts_with(ro)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read-only path: {}", path.display()),
            ));
        }
        Ok(())
    }
}

/// In-memory filesystem for testing without real I/O.
///
/// Paths are used as given; tests conventionally use absolute paths like
/// `/proj/source`.
#[derive(Debug, Default)]
pub struct MemoryFs {
    state: Mutex<MemoryState>,
}

impl MemoryFs {
    /// Create a new empty filesystem.
    pub fn new() -> Self {
        MemoryFs::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory fs lock poisoned")
    }

    /// Add a file with the given content, creating parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut state = self.state();
        if let Some(parent) = path.parent() {
            state.add_dir(parent);
        }
        state.files.insert(path.to_path_buf(), content.into());
    }

    /// Add a directory and all of its parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.state().add_dir(path.as_ref());
    }

    /// Make every write at or beneath `path` fail with `PermissionDenied`.
    pub fn deny_writes(&self, path: impl AsRef<Path>) {
        self.state().read_only.push(path.as_ref().to_path_buf());
    }

    /// All file paths, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.state().files.keys().cloned().collect()
    }

    /// Read a file as a string, panicking if it is missing.
    pub fn contents(&self, path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        self.read_to_string(path)
            .unwrap_or_else(|_| panic!("file not found: {}", path.display()))
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.state().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state();
        state.check_writable(path)?;
        if let Some(parent) = path.parent() {
            state.add_dir(parent);
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state();
        state.check_writable(path)?;
        state.add_dir(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn walk_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .state()
            .files
            .keys()
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .cloned()
            .collect())
    }
}

/// Assertion helpers for testing.
pub mod assertions {
    use super::*;

    /// Assert that a path exists in the memory filesystem.
    pub fn assert_path_exists(fs: &MemoryFs, path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(fs.exists(path), "expected path to exist: {}", path.display());
    }

    /// Assert that a file contains specific content.
    pub fn assert_file_contains(fs: &MemoryFs, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        let actual = fs.contents(path);
        assert!(
            actual.contains(content),
            "file {} does not contain '{}'\nactual content:\n{}",
            path.display(),
            content,
            actual
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs_basic() {
        let fs = MemoryFs::new();
        fs.add_file("/project/source/force-app/ApexClass/Foo.cls", "class Foo {}");

        assert!(fs.exists(Path::new("/project")));
        assert!(fs.exists(Path::new("/project/source/force-app/ApexClass")));
        assert!(!fs.exists(Path::new("/project/nonexistent")));

        let content = fs
            .read_to_string(Path::new("/project/source/force-app/ApexClass/Foo.cls"))
            .unwrap();
        assert_eq!(content, "class Foo {}");
    }

    #[test]
    fn test_memory_fs_write_creates_parents() {
        let fs = MemoryFs::new();
        fs.write(Path::new("/a/b/c.txt"), b"x").unwrap();
        assert!(fs.exists(Path::new("/a/b")));
        assert!(fs.exists(Path::new("/a")));
    }

    #[test]
    fn test_memory_fs_walk_is_scoped_and_sorted() {
        let fs = MemoryFs::new();
        fs.add_file("/ws/force-app/B/two", "2");
        fs.add_file("/ws/force-app/A/one", "1");
        fs.add_file("/ws/logs/retrieve.log", "log");
        fs.add_file("/ws/force-app-other/C/three", "3");

        let files = fs.walk_files(Path::new("/ws/force-app")).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/ws/force-app/A/one"),
                PathBuf::from("/ws/force-app/B/two"),
            ]
        );
    }

    #[test]
    fn test_memory_fs_deny_writes() {
        let fs = MemoryFs::new();
        fs.deny_writes("/locked");

        let err = fs.write(Path::new("/locked/file"), b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(fs.write(Path::new("/open/file"), b"x").is_ok());
    }

    #[test]
    fn test_assertions() {
        use assertions::*;

        let fs = MemoryFs::new();
        fs.add_file("/log.txt", "hello world");
        assert_path_exists(&fs, "/log.txt");
        assert_file_contains(&fs, "/log.txt", "world");
    }
}
