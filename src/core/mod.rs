//! Core data structures for metasync.
//!
//! This module contains the foundational types used throughout the pipeline:
//! - Component types and their members
//! - Change records produced by the workspace diff
//! - Package manifest rendering and parsing
//! - The per-project path layout

pub mod change;
pub mod component;
pub mod layout;
pub mod manifest;

pub use change::{Change, ChangeStatus};
pub use component::{default_types, ComponentType};
pub use layout::{ManifestKind, ProjectLayout, RetrieveTarget, COMPONENT_DIR};
pub use manifest::{
    build_package_xml, parse_manifest_file, parse_members, save_manifest, SENTINEL_COMPONENT,
};
