//! Component types: a metadata category plus the members requested under it.

use std::collections::HashSet;
use std::path::{Component, Path};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Member rendered when a type lists no explicit members.
pub const WILDCARD_MEMBER: &str = "*";

/// One metadata category and the named members requested, retrieved or
/// deployed under it.
///
/// Members are logically a set. Duplicates are tolerated here and collapsed
/// when a manifest is built; insertion order is kept for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentType {
    /// Type name (e.g. `ApexClass`)
    pub name: String,

    /// Member identifiers, in insertion order
    #[serde(default)]
    pub members: Vec<String>,
}

impl ComponentType {
    /// Create a type with no explicit members.
    pub fn new(name: impl Into<String>) -> Self {
        ComponentType {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Create a type with the given members.
    pub fn with_members<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ComponentType {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Members with duplicates removed, first occurrence wins.
    pub fn unique_members(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.members
            .iter()
            .map(String::as_str)
            .filter(|m| seen.insert(*m))
            .collect()
    }

    /// Reject a name or member that would not stay beneath the directory it
    /// is joined onto: absolute paths, `..`, `.` or drive prefixes.
    pub fn check_paths(&self) -> Result<(), ComponentTypeParseError> {
        for part in std::iter::once(&self.name).chain(&self.members) {
            let contained = Path::new(part)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
            if !contained {
                return Err(ComponentTypeParseError::UnsafePath(part.clone()));
            }
        }
        Ok(())
    }

    /// Members to render in a manifest: the unique members, or the wildcard.
    pub fn manifest_members(&self) -> Vec<&str> {
        if self.members.is_empty() {
            vec![WILDCARD_MEMBER]
        } else {
            self.unique_members()
        }
    }
}

/// Error parsing a `Type=member,member` descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComponentTypeParseError {
    #[error("component type descriptor is empty")]
    Empty,

    #[error("component type name is missing in `{0}`")]
    MissingName(String),

    #[error("`{0}` is not a plain relative name")]
    UnsafePath(String),
}

impl FromStr for ComponentType {
    type Err = ComponentTypeParseError;

    /// Parse `ApexClass` or `CustomObject=Account,Contact`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ComponentTypeParseError::Empty);
        }

        let (name, members) = match s.split_once('=') {
            Some((name, members)) => (name.trim(), members),
            None => (s, ""),
        };
        if name.is_empty() {
            return Err(ComponentTypeParseError::MissingName(s.to_string()));
        }

        let members = members
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();

        let ty = ComponentType {
            name: name.to_string(),
            members,
        };
        ty.check_paths()?;
        Ok(ty)
    }
}

/// Types requested when the caller does not name any.
pub fn default_types() -> Vec<ComponentType> {
    vec![
        ComponentType::with_members("CustomObject", ["Account", "Contact"]),
        ComponentType::with_members("ApexClass", ["SampleController"]),
        ComponentType::with_members("AuraDefinitionBundle", ["SampleBundle"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_members_keeps_first_occurrence() {
        let ty = ComponentType::with_members("ApexClass", ["B", "A", "B", "C", "A"]);
        assert_eq!(ty.unique_members(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_manifest_members_wildcard() {
        let ty = ComponentType::new("ApexClass");
        assert_eq!(ty.manifest_members(), vec!["*"]);
    }

    #[test]
    fn test_parse_descriptor() {
        let ty: ComponentType = "CustomObject=Account, Contact,,".parse().unwrap();
        assert_eq!(ty.name, "CustomObject");
        assert_eq!(ty.members, vec!["Account", "Contact"]);

        let ty: ComponentType = "ApexClass".parse().unwrap();
        assert_eq!(ty.name, "ApexClass");
        assert!(ty.members.is_empty());
    }

    #[test]
    fn test_parse_descriptor_errors() {
        assert_eq!(
            "  ".parse::<ComponentType>(),
            Err(ComponentTypeParseError::Empty)
        );
        assert!(matches!(
            "=Foo".parse::<ComponentType>(),
            Err(ComponentTypeParseError::MissingName(_))
        ));
    }

    #[test]
    fn test_check_paths_rejects_escaping_names() {
        for bad in ["/etc/pwn", "../../../outside", "..", "a/../../b", "."] {
            let ty = ComponentType::with_members("ApexClass", [bad]);
            assert_eq!(
                ty.check_paths(),
                Err(ComponentTypeParseError::UnsafePath(bad.to_string())),
                "{bad}"
            );
        }

        let ty = ComponentType::new("../ApexClass");
        assert!(ty.check_paths().is_err());

        let ty = ComponentType::with_members("AuraDefinitionBundle", ["Bundle/Bundle.cmp", "Foo"]);
        assert_eq!(ty.check_paths(), Ok(()));
    }

    #[test]
    fn test_parse_descriptor_rejects_escaping_member() {
        assert!(matches!(
            "ApexClass=Foo,/etc/pwn".parse::<ComponentType>(),
            Err(ComponentTypeParseError::UnsafePath(p)) if p == "/etc/pwn"
        ));
    }

    #[test]
    fn test_deserialize_without_members() {
        let ty: ComponentType = serde_json::from_str(r#"{"name":"ApexClass"}"#).unwrap();
        assert_eq!(ty, ComponentType::new("ApexClass"));
    }

    #[test]
    fn test_default_types() {
        let types = default_types();
        let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["CustomObject", "ApexClass", "AuraDefinitionBundle"]);
    }
}
