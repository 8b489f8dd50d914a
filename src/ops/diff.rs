//! Workspace comparison.
//!
//! Walks the `force-app` tree of two workspaces and classifies every distinct
//! relative path as added, removed or changed. Paths whose content is
//! identical on both sides produce no record.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::core::change::{Change, ChangeStatus};
use crate::core::layout::COMPONENT_DIR;
use crate::util::fs::{relative_path, to_slash, write_string, FileSystem};
use crate::util::hash::sha256_file;

/// Header row of the comparison log.
pub const COMPARISON_HEADER: &str = "type,name,status,path";

/// Content digests of one workspace, keyed by `/`-separated path relative to
/// its component directory.
pub type Snapshot = BTreeMap<String, String>;

/// Digest every component file under `<workspace_root>/force-app`.
///
/// A missing workspace or component directory yields an empty snapshot.
pub fn snapshot(fs: &dyn FileSystem, workspace_root: &Path) -> Result<Snapshot> {
    let base = workspace_root.join(COMPONENT_DIR);
    let mut snapshot = Snapshot::new();

    for file in fs.walk_files(&base)? {
        let rel = to_slash(&relative_path(&base, &file));
        let digest = sha256_file(fs, &file)?;
        snapshot.insert(rel, digest);
    }

    tracing::debug!("snapshot of {}: {} files", base.display(), snapshot.len());
    Ok(snapshot)
}

/// Compare two snapshots.
///
/// Source-side paths come first in sorted order, followed by paths that only
/// exist in the destination.
pub fn diff_snapshots(source: &Snapshot, destination: &Snapshot) -> Vec<Change> {
    let mut changes = Vec::new();

    for (path, src_digest) in source {
        match destination.get(path) {
            None => changes.push(Change::from_relative_path(path.as_str(), ChangeStatus::Removed)),
            Some(dest_digest) if dest_digest != src_digest => {
                changes.push(Change::from_relative_path(path.as_str(), ChangeStatus::Changed))
            }
            Some(_) => {}
        }
    }

    for path in destination.keys() {
        if !source.contains_key(path) {
            changes.push(Change::from_relative_path(path.as_str(), ChangeStatus::Added));
        }
    }

    changes
}

/// Diff the component trees of two workspace roots.
pub fn diff_workspaces(
    fs: &dyn FileSystem,
    source_root: &Path,
    destination_root: &Path,
) -> Result<Vec<Change>> {
    let source = snapshot(fs, source_root)?;
    let destination = snapshot(fs, destination_root)?;
    let changes = diff_snapshots(&source, &destination);

    tracing::info!(
        "compared {} source and {} destination files: {} changes",
        source.len(),
        destination.len(),
        changes.len()
    );
    Ok(changes)
}

/// Render the comparison log: a header row plus one row per change.
pub fn format_comparison_log(changes: &[Change]) -> String {
    let body = changes
        .iter()
        .map(Change::to_csv_row)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n{}", COMPARISON_HEADER, body)
}

/// Write the comparison log to `path`, creating parent directories.
pub fn write_comparison_log(fs: &dyn FileSystem, path: &Path, changes: &[Change]) -> Result<()> {
    write_string(fs, path, &format_comparison_log(changes))
}
