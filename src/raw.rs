//! The external, unresolved-descriptor boundary.
//!
//! `RawPom` is a trait rather than a concrete struct so any backing
//! representation (an XML DOM, a database row, a synthetic test fixture)
//! can implement this accessor surface and be handed to the resolver.
//! Producing a `RawPom`, the raw XML decoder, stays out of scope for the
//! core; `default_impl.rs` ships one reference implementation behind the
//! `default-impl` feature.

use std::collections::HashMap;

/// Raw, possibly-placeholder-bearing coordinate fields. `None` means the
/// field was absent from the descriptor (to be inherited from a parent, or
/// to fail normalization if no parent supplies it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCoordinates {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
}

/// A `<parent>` reference. Per Maven convention these fields are literal:
/// a POM cannot use an inherited property to name its own parent, so
/// unlike `RawCoordinates` they are not optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Hint for file-system lookups of the parent; passed through to the
    /// downloader untouched.
    pub relative_path: Option<String>,
}

/// A dependency exclusion (`<exclusions><exclusion>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawExclusion {
    pub group_id: String,
    pub artifact_id: String,
}

/// A `<dependency>` element, raw (coordinates may still contain placeholders).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDependency {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub r#type: Option<String>,
    pub classifier: Option<String>,
    pub optional: bool,
    pub exclusions: Vec<RawExclusion>,
}

/// A `<dependencyManagement><dependencies><dependency>` element. Structurally
/// identical to `RawDependency` (Maven reuses the same element shape) but
/// kept as a distinct type since management entries and direct dependencies
/// are composed by different code with different validation rules.
pub type RawManagedDependency = RawDependency;

/// A `<repository>` element, raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRepository {
    pub id: Option<String>,
    pub url: String,
}

/// A `<license>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct License {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// The unresolved project descriptor's accessor contract. Profile
/// activation itself happens below this boundary: every `active_*` method
/// here is handed the list of already-activated profile names and simply
/// returns the union of the unconditional and profile-qualified entries.
pub trait RawPom {
    fn coordinates(&self) -> RawCoordinates;
    fn parent(&self) -> Option<RawParentRef>;
    fn active_properties(&self, profiles: &[String]) -> HashMap<String, String>;
    fn active_repositories(&self, profiles: &[String]) -> Vec<RawRepository>;
    fn active_dependency_management(&self, profiles: &[String]) -> Vec<RawManagedDependency>;
    fn active_dependencies(&self, profiles: &[String]) -> Vec<RawDependency>;
    fn is_snapshot(&self) -> bool;
    /// Every `${...}` key the descriptor's source text mentions anywhere,
    /// independent of whether it resolves. Useful for diagnostics/tooling
    /// built on top of the resolver.
    fn property_placeholder_names(&self) -> Vec<String>;
    fn licenses(&self) -> Vec<License>;
    fn name(&self) -> Option<String>;
    fn description(&self) -> Option<String>;
    fn packaging(&self) -> Option<String>;
}
