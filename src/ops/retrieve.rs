//! Simulated chunked retrieval.
//!
//! Materializes one placeholder artifact per requested member under
//! `<workspace>/force-app/<type>/<member>.txt` and records each one in
//! `<workspace>/logs/<target>-retrieve.log`. Nothing is fetched from a remote
//! org and there is no failure path.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::component::ComponentType;
use crate::core::layout::COMPONENT_DIR;
use crate::util::fs::{write_string, FileSystem};

/// Extension of synthesized artifacts.
pub const ARTIFACT_EXTENSION: &str = "txt";

/// Outcome of retrieving one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetrievalStatus {
    Retrieved,
}

impl fmt::Display for RetrievalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalStatus::Retrieved => f.write_str("Retrieved"),
        }
    }
}

/// One retrieved member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalEntry {
    #[serde(rename = "type")]
    pub component_type: String,
    pub member: String,
    pub status: RetrievalStatus,
    pub file_path: PathBuf,
}

impl RetrievalEntry {
    /// `type,member,status,filePath`
    pub fn to_log_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.component_type,
            self.member,
            self.status,
            self.file_path.display()
        )
    }
}

/// Every retrieved member, in request order, plus where the log went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResult {
    pub entries: Vec<RetrievalEntry>,
    pub log_path: PathBuf,
}

/// Member synthesized for a type requested without explicit members.
pub fn default_member(type_name: &str) -> String {
    format!("Sample{}", type_name)
}

/// Log path for a retrieval into `workspace_root`.
pub fn retrieval_log_path(workspace_root: &Path, target_label: &str) -> PathBuf {
    workspace_root
        .join("logs")
        .join(format!("{}-retrieve.log", target_label))
}

/// Retrieve `types` into `workspace_root`.
///
/// Every type and member must be a plain relative name; nothing is written
/// when one is not.
pub fn retrieve(
    fs: &dyn FileSystem,
    target_label: &str,
    workspace_root: &Path,
    types: &[ComponentType],
) -> Result<RetrievalResult> {
    for ty in types {
        ty.check_paths()
            .with_context(|| format!("cannot retrieve component type {}", ty.name))?;
    }

    let component_root = workspace_root.join(COMPONENT_DIR);
    let mut entries = Vec::new();

    for ty in types {
        let members = if ty.members.is_empty() {
            vec![default_member(&ty.name)]
        } else {
            ty.unique_members().into_iter().map(str::to_string).collect()
        };

        for member in members {
            let file_path = component_root
                .join(&ty.name)
                .join(format!("{}.{}", member, ARTIFACT_EXTENSION));
            let content = format!(
                "// {}:{}\nRetrieved at {}",
                ty.name,
                member,
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
            );
            write_string(fs, &file_path, &content)?;

            tracing::debug!("retrieved {}:{}", ty.name, member);
            entries.push(RetrievalEntry {
                component_type: ty.name.clone(),
                member,
                status: RetrievalStatus::Retrieved,
                file_path,
            });
        }
    }

    let log_path = retrieval_log_path(workspace_root, target_label);
    let log = entries
        .iter()
        .map(RetrievalEntry::to_log_line)
        .collect::<Vec<_>>()
        .join("\n");
    write_string(fs, &log_path, &log)?;

    tracing::info!(
        "retrieved {} components into {}",
        entries.len(),
        workspace_root.display()
    );
    Ok(RetrievalResult { entries, log_path })
}
