//! Project comparison: diff, comparison log and both manifests in one pass.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::change::Change;
use crate::core::layout::{ManifestKind, ProjectLayout};
use crate::ops::delta::{generate_delta_manifest, generate_destructive_changes};
use crate::ops::diff::{diff_workspaces, write_comparison_log};
use crate::util::fs::FileSystem;

/// Artifacts produced by [`compare`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub changes: Vec<Change>,
    pub diff_log: PathBuf,
    pub delta_manifest: PathBuf,

    /// Only set when removals exist
    pub destructive_manifest: Option<PathBuf>,
}

/// Diff the project's source against its destination and write the
/// comparison log, the delta manifest and, if anything was removed, the
/// destructive-changes manifest.
pub fn compare(
    fs: &dyn FileSystem,
    layout: &ProjectLayout,
    api_version: &str,
) -> Result<ComparisonResult> {
    let changes = diff_workspaces(fs, &layout.source, &layout.destination)?;

    let diff_log = layout.comparison_log();
    write_comparison_log(fs, &diff_log, &changes)?;

    let delta_manifest = layout.manifest(ManifestKind::Delta);
    generate_delta_manifest(fs, &delta_manifest, &changes, api_version)?;

    let destructive_path = layout.destructive_manifest();
    let destructive_manifest =
        generate_destructive_changes(fs, &destructive_path, &changes, api_version)?
            .map(|_| destructive_path);

    Ok(ComparisonResult {
        changes,
        diff_log,
        delta_manifest,
        destructive_manifest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::change::ChangeStatus;
    use crate::core::manifest::parse_members;
    use crate::ops::deploy::{simulate_deploy, DeployOptions, DeployStatus};
    use crate::test_support::assertions::assert_path_exists;
    use crate::test_support::{MemoryFs, WorkspaceFixture};

    #[test]
    fn test_compare_writes_all_artifacts() {
        let fs = MemoryFs::new();
        let layout = ProjectLayout::new("/p");
        WorkspaceFixture::new()
            .component("ApexClass/Old.cls", "old")
            .component("CustomObject/Account.object", "v1")
            .write_to(&fs, &layout.source);
        WorkspaceFixture::new()
            .component("CustomObject/Account.object", "v2")
            .component("ApexClass/New.cls", "new")
            .write_to(&fs, &layout.destination);

        let result = compare(&fs, &layout, "59.0").unwrap();

        assert_eq!(result.changes.len(), 3);
        assert!(fs.contents(&result.diff_log).starts_with("type,name,status,path\n"));

        let delta = fs.contents(&result.delta_manifest);
        let mut members = parse_members(&delta);
        members.sort();
        assert_eq!(members, vec!["Account.object", "New.cls"]);

        let destructive = result.destructive_manifest.unwrap();
        assert_path_exists(&fs, layout.destructive_manifest());
        assert_eq!(parse_members(&fs.contents(destructive)), vec!["Old.cls"]);
    }

    #[test]
    fn test_compare_without_removals_skips_destructive() {
        let fs = MemoryFs::new();
        let layout = ProjectLayout::new("/p");
        WorkspaceFixture::new()
            .component("ApexClass/New.cls", "new")
            .write_to(&fs, &layout.destination);

        let result = compare(&fs, &layout, "59.0").unwrap();

        assert_eq!(result.changes[0].status(), ChangeStatus::Added);
        assert!(result.destructive_manifest.is_none());
        assert!(!fs.exists(&layout.destructive_manifest()));
    }

    #[test]
    fn test_compare_then_deploy_delta() {
        let fs = MemoryFs::new();
        let layout = ProjectLayout::new("/p");
        WorkspaceFixture::new()
            .component("ApexClass/Good.cls", "a")
            .component("ApexClass/FailingJob.cls", "b")
            .write_to(&fs, &layout.destination);

        let comparison = compare(&fs, &layout, "59.0").unwrap();
        let opts = DeployOptions {
            manifest_path: Some(comparison.delta_manifest),
            ..DeployOptions::default()
        };
        let result = simulate_deploy(&fs, &layout.deploy_log(), &opts).unwrap();

        assert_eq!(result.status, DeployStatus::SucceededWithRetry);
        assert_eq!(result.failed_components, vec!["FailingJob.cls"]);
        assert_eq!(result.retried_components, vec!["Good.cls"]);
    }

    #[test]
    fn test_compare_of_empty_project() {
        let fs = MemoryFs::new();
        let layout = ProjectLayout::new("/p");

        let result = compare(&fs, &layout, "59.0").unwrap();
        assert!(result.changes.is_empty());
        assert_eq!(fs.contents(&result.diff_log), "type,name,status,path\n");
        assert_eq!(
            parse_members(&fs.contents(&result.delta_manifest)),
            vec!["delta-package"]
        );
    }
}
