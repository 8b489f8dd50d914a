//! Test fixtures for component workspaces.

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::layout::COMPONENT_DIR;
use crate::test_support::MemoryFs;

/// A set of component files keyed by path relative to the component root.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceFixture {
    /// `Type/Name` -> content
    pub components: BTreeMap<String, String>,
}

impl WorkspaceFixture {
    /// Create an empty fixture.
    pub fn new() -> Self {
        WorkspaceFixture::default()
    }

    /// Add a component file, e.g. `ApexClass/Foo.cls`.
    pub fn component(mut self, relative_path: &str, content: &str) -> Self {
        self.components
            .insert(relative_path.to_string(), content.to_string());
        self
    }

    /// A small org snapshot with one object, one class and its metadata.
    pub fn sample_org() -> Self {
        WorkspaceFixture::new()
            .component("CustomObject/Account.object", "<CustomObject/>")
            .component("ApexClass/SampleController.cls", "public class SampleController {}")
            .component(
                "ApexClass/SampleController.cls-meta.xml",
                "<ApexClass><apiVersion>59.0</apiVersion></ApexClass>",
            )
    }

    /// Write the fixture beneath `<workspace_root>/force-app` in memory.
    pub fn write_to(&self, fs: &MemoryFs, workspace_root: impl AsRef<Path>) {
        let base = workspace_root.as_ref().join(COMPONENT_DIR);
        for (rel, content) in &self.components {
            fs.add_file(base.join(rel), content.as_bytes());
        }
    }

    /// Write the fixture beneath `<workspace_root>/force-app` on disk.
    pub fn write_to_disk(&self, workspace_root: impl AsRef<Path>) {
        let base = workspace_root.as_ref().join(COMPONENT_DIR);
        for (rel, content) in &self.components {
            let path = base.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("failed to create fixture dir");
            }
            std::fs::write(&path, content).expect("failed to write fixture file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::fs::FileSystem;

    #[test]
    fn test_fixture_write_to_memory() {
        let fs = MemoryFs::new();
        WorkspaceFixture::sample_org().write_to(&fs, "/proj/source");

        let files = fs.walk_files(Path::new("/proj/source/force-app")).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_fixture_write_to_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        WorkspaceFixture::new()
            .component("ApexClass/Foo.cls", "x")
            .write_to_disk(tmp.path());

        assert!(tmp.path().join("force-app/ApexClass/Foo.cls").exists());
    }
}
