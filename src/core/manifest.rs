//! Package manifest rendering and parsing.
//!
//! A package manifest is the declarative XML document listing the component
//! types and members an operation covers:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Package xmlns="http://soap.sforce.com/2006/04/metadata">
//!   <types>
//!     <members>Account</members>
//!     <name>CustomObject</name>
//!   </types>
//!   <version>59.0</version>
//! </Package>
//! ```
//!
//! Rendering is byte-for-byte deterministic for a given ordered input.
//! Parsing is deliberately permissive: it only recovers the flat member list.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::core::component::ComponentType;
use crate::util::fs::{write_string, FileSystem};

/// Schema namespace carried by the `<Package>` envelope.
pub const PACKAGE_XMLNS: &str = "http://soap.sforce.com/2006/04/metadata";

/// Component name reported when a manifest lists no members.
///
/// The deploy simulator needs at least one name to inspect, so an empty or
/// missing manifest is treated as one opaque package.
pub const SENTINEL_COMPONENT: &str = "delta-package";

static MEMBERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<members>(.*?)</members>").expect("valid members regex"));

/// Render `types` into a package document.
///
/// Type blocks are indented two spaces and members four. A type with no
/// members renders a single `*` member; duplicate members are collapsed.
pub fn build_package_xml(types: &[ComponentType], version: &str) -> String {
    let body = types
        .iter()
        .map(|ty| {
            let members = ty
                .manifest_members()
                .into_iter()
                .map(|m| format!("    <members>{}</members>", escape_xml(m)))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "  <types>\n{}\n    <name>{}</name>\n  </types>",
                members,
                escape_xml(&ty.name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Package xmlns=\"{}\">\n{}\n  <version>{}</version>\n</Package>",
        PACKAGE_XMLNS,
        body,
        escape_xml(version)
    )
}

/// Extract every member identifier from a manifest document.
///
/// Returns `[SENTINEL_COMPONENT]` when the document has no members.
pub fn parse_members(xml: &str) -> Vec<String> {
    let members: Vec<String> = MEMBERS_RE
        .captures_iter(xml)
        .map(|caps| unescape_xml(&caps[1]))
        .collect();

    if members.is_empty() {
        vec![SENTINEL_COMPONENT.to_string()]
    } else {
        members
    }
}

/// Read a manifest and extract its members.
///
/// A missing manifest yields the sentinel list, like an empty one.
pub fn parse_manifest_file(fs: &dyn FileSystem, path: &Path) -> Result<Vec<String>> {
    if !fs.exists(path) {
        tracing::debug!("manifest {} not found, using sentinel", path.display());
        return Ok(vec![SENTINEL_COMPONENT.to_string()]);
    }

    let xml = fs
        .read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    Ok(parse_members(&xml))
}

/// Render `types` and write the document to `path`, creating parent
/// directories. Returns the rendered text.
pub fn save_manifest(
    fs: &dyn FileSystem,
    path: &Path,
    types: &[ComponentType],
    version: &str,
) -> Result<String> {
    let xml = build_package_xml(types, version);
    write_string(fs, path, &xml)?;
    tracing::debug!("wrote manifest {} ({} types)", path.display(), types.len());
    Ok(xml)
}

/// Escape markup characters, and control characters as numeric references
/// so a member never spans lines in the rendered document.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push_str(&format!("&#{};", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            // Not an entity: keep the ampersand literally
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => name.strip_prefix('#')?.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
