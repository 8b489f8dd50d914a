//! Change records produced by the workspace diff.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type reported for files sitting directly in the component root.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// How a relative path differs between source and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChangeStatus {
    /// Present only in the destination
    Added,
    /// Present only in the source
    Removed,
    /// Present on both sides with different content
    Changed,
}

impl ChangeStatus {
    /// Whether this change belongs in a delta manifest.
    pub fn is_delta(self) -> bool {
        matches!(self, ChangeStatus::Added | ChangeStatus::Changed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeStatus::Added => "Added",
            ChangeStatus::Removed => "Removed",
            ChangeStatus::Changed => "Changed",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One differing component file.
///
/// Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(rename = "type")]
    component_type: String,
    name: String,
    status: ChangeStatus,
    relative_path: String,
}

impl Change {
    /// Build a change from a `/`-separated path relative to the component root.
    ///
    /// The first segment is the type and the remainder is the name. A path
    /// with a single segment has type [`UNKNOWN_TYPE`] and keeps the whole path
    /// as its name.
    pub fn from_relative_path(relative_path: impl Into<String>, status: ChangeStatus) -> Self {
        let relative_path = relative_path.into();
        let (component_type, name) = match relative_path.split_once('/') {
            Some((ty, rest)) if !ty.is_empty() && !rest.is_empty() => {
                (ty.to_string(), rest.to_string())
            }
            _ => (UNKNOWN_TYPE.to_string(), relative_path.clone()),
        };

        Change {
            component_type,
            name,
            status,
            relative_path,
        }
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ChangeStatus {
        self.status
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// `type,name,status,relativePath`
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{}",
            self.component_type, self.name, self.status, self.relative_path
        )
    }
}
