//! Delta and destructive-changes manifest synthesis.
//!
//! Both manifests group change names by type after stripping the `.meta.xml`
//! suffix, so a component and its metadata sidecar collapse into one member.
//! Types and members are emitted in sorted order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Result;

use crate::core::change::{Change, ChangeStatus};
use crate::core::component::ComponentType;
use crate::core::manifest::{build_package_xml, save_manifest};
use crate::util::fs::FileSystem;

/// Suffix of metadata sidecar files, stripped before grouping.
pub const META_SUFFIX: &str = ".meta.xml";

/// Group change names into component types.
pub fn group_changes<'a>(changes: impl IntoIterator<Item = &'a Change>) -> Vec<ComponentType> {
    let mut grouped: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for change in changes {
        let name = change
            .name()
            .strip_suffix(META_SUFFIX)
            .unwrap_or(change.name());
        grouped
            .entry(change.component_type())
            .or_default()
            .insert(name);
    }

    grouped
        .into_iter()
        .map(|(ty, members)| ComponentType::with_members(ty, members))
        .collect()
}

/// Types covering every added or changed component.
pub fn delta_types(changes: &[Change]) -> Vec<ComponentType> {
    group_changes(changes.iter().filter(|c| c.status().is_delta()))
}

/// Types covering every removed component.
pub fn destructive_types(changes: &[Change]) -> Vec<ComponentType> {
    group_changes(
        changes
            .iter()
            .filter(|c| c.status() == ChangeStatus::Removed),
    )
}

/// Render the delta manifest.
pub fn build_delta(changes: &[Change], version: &str) -> String {
    build_package_xml(&delta_types(changes), version)
}

/// Render the destructive-changes manifest, or `None` when nothing was removed.
pub fn build_destructive(changes: &[Change], version: &str) -> Option<String> {
    let types = destructive_types(changes);
    if types.is_empty() {
        None
    } else {
        Some(build_package_xml(&types, version))
    }
}

/// Write the delta manifest to `path` and return it.
pub fn generate_delta_manifest(
    fs: &dyn FileSystem,
    path: &Path,
    changes: &[Change],
    version: &str,
) -> Result<String> {
    let types = delta_types(changes);
    tracing::debug!("delta manifest covers {} types", types.len());
    save_manifest(fs, path, &types, version)
}

/// Write the destructive-changes manifest to `path` when removals exist.
///
/// Nothing is written, and `None` returned, when no change is a removal.
pub fn generate_destructive_changes(
    fs: &dyn FileSystem,
    path: &Path,
    changes: &[Change],
    version: &str,
) -> Result<Option<String>> {
    let types = destructive_types(changes);
    if types.is_empty() {
        tracing::debug!("no removals, skipping {}", path.display());
        return Ok(None);
    }
    save_manifest(fs, path, &types, version).map(Some)
}
