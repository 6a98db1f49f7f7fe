//! Coordinates, dependency keys, scopes, and the coordinate normalizer.
//!
//! Splits a placeholder-free `Coordinate` (the normalizer's output) from
//! the raw, possibly-placeholder-bearing coordinate fields a `RawPom`
//! exposes (see `raw.rs`).

use std::collections::HashMap;
use std::fmt;

use crate::error::{ErrorSink, ResolverError};
use crate::placeholder::{contains_placeholder, evaluate};
use crate::raw::{RawCoordinates, RawParentRef};

/// A fully resolved `(groupId, artifactId, version)` triple. None of these
/// fields may contain `${` once a `Coordinate` exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Coordinate {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// The `(groupId, artifactId)` pair that keys dependency and managed-dependency maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey {
    pub group_id: String,
    pub artifact_id: String,
}

impl DependencyKey {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        DependencyKey {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    pub fn from_coordinate(coordinate: &Coordinate) -> Self {
        DependencyKey::new(coordinate.group_id.clone(), coordinate.artifact_id.clone())
    }
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// Recognized Maven dependency scopes. Anything else is invalid, and the
/// entry carrying it is filtered out rather than defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

impl Scope {
    /// `None` raw scope means "use the default" (`compile`). `Some` raw scope
    /// that doesn't match a recognized token is `None` here too; the caller
    /// is responsible for distinguishing "absent, use default" from "present
    /// but invalid, reject the entry" (see `dependency.rs`/`dependency_management.rs`).
    pub fn parse(raw: &str) -> Option<Scope> {
        match raw {
            "compile" => Some(Scope::Compile),
            "provided" => Some(Scope::Provided),
            "runtime" => Some(Scope::Runtime),
            "test" => Some(Scope::Test),
            "system" => Some(Scope::System),
            "import" => Some(Scope::Import),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Import => "import",
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Compile
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserved property names: `groupId`/`artifactId`/`version` with their
/// `project.`/`pom.` aliases, plus `project.parent.*`. Building the lookup
/// closure here keeps the priority chain in one place instead of being
/// reimplemented at every call site that needs it.
pub fn reserved_lookup<'a>(
    own_group_id: Option<&'a str>,
    own_artifact_id: Option<&'a str>,
    own_version: Option<&'a str>,
    parent_ref: Option<&'a RawParentRef>,
) -> impl Fn(&str) -> Option<String> + 'a {
    move |key: &str| match key {
        "groupId" | "project.groupId" | "pom.groupId" => own_group_id.map(str::to_owned),
        "artifactId" | "project.artifactId" | "pom.artifactId" => own_artifact_id.map(str::to_owned),
        "version" | "project.version" | "pom.version" => own_version.map(str::to_owned),
        "project.parent.groupId" => parent_ref.map(|p| p.group_id.clone()),
        "project.parent.artifactId" => parent_ref.map(|p| p.artifact_id.clone()),
        "project.parent.version" => parent_ref.map(|p| p.version.clone()),
        _ => None,
    }
}

/// Compute concrete `(groupId, artifactId, version)` for a RawPom, falling
/// back to the parent reference's own literal fields when a field is
/// absent. Returns `None` (after reporting) if any of the three ends up
/// absent or still containing `${`.
///
/// `context` is a human-readable label for error messages (e.g. the raw
/// artifactId, or "<unknown>" if even that is missing).
pub fn normalize(
    context: &str,
    own: &RawCoordinates,
    own_properties: &HashMap<String, String>,
    process_overrides: &HashMap<String, String>,
    parent_ref: Option<&RawParentRef>,
    sink: &dyn ErrorSink,
) -> Option<Coordinate> {
    // Evaluated progressively so that e.g. `artifactId` may reference
    // `${project.groupId}` once `groupId` itself has been resolved.
    let mut resolved_group: Option<String> = None;
    let mut resolved_artifact: Option<String> = None;
    let mut resolved_version: Option<String> = None;

    let lookup = |key: &str,
                  resolved_group: &Option<String>,
                  resolved_artifact: &Option<String>,
                  resolved_version: &Option<String>|
     -> Option<String> {
        let reserved = reserved_lookup(
            resolved_group.as_deref(),
            resolved_artifact.as_deref(),
            resolved_version.as_deref(),
            parent_ref,
        );
        reserved(key)
            .or_else(|| process_overrides.get(key).cloned())
            .or_else(|| own_properties.get(key).cloned())
    };

    let raw_group = own
        .group_id
        .clone()
        .or_else(|| parent_ref.map(|p| p.group_id.clone()));
    if let Some(raw) = raw_group {
        resolved_group = Some(evaluate(&raw, |k| {
            lookup(k, &resolved_group, &resolved_artifact, &resolved_version)
        }));
    }

    let raw_artifact = own.artifact_id.clone();
    if let Some(raw) = raw_artifact {
        resolved_artifact = Some(evaluate(&raw, |k| {
            lookup(k, &resolved_group, &resolved_artifact, &resolved_version)
        }));
    }

    let raw_version = own
        .version
        .clone()
        .or_else(|| parent_ref.map(|p| p.version.clone()));
    if let Some(raw) = raw_version {
        resolved_version = Some(evaluate(&raw, |k| {
            lookup(k, &resolved_group, &resolved_artifact, &resolved_version)
        }));
    }

    let mut missing_or_unresolved = |field: &'static str, value: &Option<String>| -> bool {
        match value {
            None => {
                sink.report(ResolverError::UnresolvedCoordinate {
                    context: context.to_owned(),
                    field,
                });
                true
            }
            Some(v) if contains_placeholder(v) => {
                sink.report(ResolverError::UnresolvedCoordinate {
                    context: context.to_owned(),
                    field,
                });
                true
            }
            Some(_) => false,
        }
    };

    let group_bad = missing_or_unresolved("groupId", &resolved_group);
    let artifact_bad = missing_or_unresolved("artifactId", &resolved_artifact);
    let version_bad = missing_or_unresolved("version", &resolved_version);

    if group_bad || artifact_bad || version_bad {
        return None;
    }

    Some(Coordinate::new(
        resolved_group.unwrap(),
        resolved_artifact.unwrap(),
        resolved_version.unwrap(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectingErrorSink;

    fn raw(group: Option<&str>, artifact: Option<&str>, version: Option<&str>) -> RawCoordinates {
        RawCoordinates {
            group_id: group.map(str::to_owned),
            artifact_id: artifact.map(str::to_owned),
            version: version.map(str::to_owned),
        }
    }

    #[test]
    fn normalizes_concrete_coordinates() {
        let sink = CollectingErrorSink::new();
        let coord = normalize(
            "child",
            &raw(Some("g"), Some("a"), Some("1.0")),
            &HashMap::new(),
            &HashMap::new(),
            None,
            &sink,
        )
        .unwrap();
        assert_eq!(coord, Coordinate::new("g", "a", "1.0"));
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn inherits_group_and_version_from_parent_ref() {
        let sink = CollectingErrorSink::new();
        let parent = RawParentRef {
            group_id: "parent.group".into(),
            artifact_id: "parent-artifact".into(),
            version: "9.9.9".into(),
            relative_path: None,
        };
        let coord = normalize(
            "child",
            &raw(None, Some("child-artifact"), None),
            &HashMap::new(),
            &HashMap::new(),
            Some(&parent),
            &sink,
        )
        .unwrap();
        assert_eq!(coord, Coordinate::new("parent.group", "child-artifact", "9.9.9"));
    }

    #[test]
    fn reports_and_fails_on_missing_artifact() {
        let sink = CollectingErrorSink::new();
        let result = normalize(
            "child",
            &raw(Some("g"), None, Some("1.0")),
            &HashMap::new(),
            &HashMap::new(),
            None,
            &sink,
        );
        assert!(result.is_none());
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn reports_and_fails_on_unresolved_placeholder() {
        let sink = CollectingErrorSink::new();
        let result = normalize(
            "child",
            &raw(Some("g"), Some("a"), Some("${missing.prop}")),
            &HashMap::new(),
            &HashMap::new(),
            None,
            &sink,
        );
        assert!(result.is_none());
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn resolves_version_from_own_property() {
        let sink = CollectingErrorSink::new();
        let mut props = HashMap::new();
        props.insert("revision".to_owned(), "2.0.0".to_owned());
        let coord = normalize(
            "child",
            &raw(Some("g"), Some("a"), Some("${revision}")),
            &props,
            &HashMap::new(),
            None,
            &sink,
        )
        .unwrap();
        assert_eq!(coord.version, "2.0.0");
    }

    #[test]
    fn process_overrides_beat_own_properties() {
        let sink = CollectingErrorSink::new();
        let mut props = HashMap::new();
        props.insert("revision".to_owned(), "own-value".to_owned());
        let mut overrides = HashMap::new();
        overrides.insert("revision".to_owned(), "override-value".to_owned());
        let coord = normalize(
            "child",
            &raw(Some("g"), Some("a"), Some("${revision}")),
            &props,
            &overrides,
            None,
            &sink,
        )
        .unwrap();
        assert_eq!(coord.version, "override-value");
    }

    #[test]
    fn scope_parse_recognizes_standard_tokens() {
        assert_eq!(Scope::parse("compile"), Some(Scope::Compile));
        assert_eq!(Scope::parse("import"), Some(Scope::Import));
        assert_eq!(Scope::parse("bogus"), None);
    }
}
