//! The internal and output data model: `PartialPom`, `EffectiveContext`,
//! `ManagedDependency`, `ResolvedDependency`, the final immutable `Pom`, and
//! the structural fingerprint used for memoization.
//!
//! Expands the flat group/artifact/version struct this crate's module
//! layout inherited into one with explicit parent links and override maps,
//! since a flat model has no notion of "effective vs. own" properties or a
//! fingerprint, and would have to cache by coordinate alone.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::coordinate::{Coordinate, DependencyKey, Scope};
use crate::raw::{License, RawExclusion, RawPom};
use crate::repository::EffectiveRepository;

/// Where a managed-dependency entry came from: declared directly, or
/// pulled in through a BOM import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedDependencySource {
    Defined,
    Imported { bom: Coordinate },
}

/// A composed `(group, artifact)` -> descriptor entry in a dependency-management table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedDependency {
    pub key: DependencyKey,
    pub version: String,
    pub scope: Scope,
    pub r#type: Option<String>,
    pub classifier: Option<String>,
    pub exclusions: Vec<RawExclusion>,
    pub source: ManagedDependencySource,
}

/// A direct or transitive dependency after conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub key: DependencyKey,
    pub resolved_version: String,
    pub requested_version: Option<String>,
    pub scope: Scope,
    pub r#type: Option<String>,
    pub optional: bool,
    pub classifier: Option<String>,
    pub exclusions: Vec<RawExclusion>,
}

/// An intermediate resolution state: concrete coordinates, a link to the
/// (already fully resolved) parent Pom, the accumulated effective
/// repository list (user-settings, then this level's own declarations,
/// then the parent's own accumulated list, child-before-parent), the
/// property override map, and the composed dependency-management table.
/// `resolved_dependencies` is filled in once direct-dependency composition
/// has run for this level.
pub struct PartialPom {
    pub coordinate: Coordinate,
    pub parent: Option<Coordinate>,
    pub repositories: Vec<EffectiveRepository>,
    /// Properties declared directly on this POM (profile-active ones folded in).
    pub properties_own: HashMap<String, String>,
    /// Properties inherited from the parent's already-resolved effective
    /// set that this POM did not itself declare.
    pub properties_override: HashMap<String, String>,
    pub dependency_management: HashMap<DependencyKey, ManagedDependency>,
    /// This level's own direct dependencies, resolved, in first-seen order
    /// (the shared cross-tree "winner" map used for conflict resolution
    /// lives in [`EffectiveContext`], not here).
    pub resolved_dependencies: Vec<ResolvedDependency>,
    pub raw: Rc<dyn RawPom>,
}

impl PartialPom {
    /// Union of own and inherited properties: the view placeholder lookup,
    /// coordinate normalization, and dependency composition all consume.
    pub fn effective_properties(&self) -> HashMap<String, String> {
        let mut merged = self.properties_override.clone();
        for (k, v) in &self.properties_own {
            merged.insert(k.clone(), v.clone());
        }
        merged
    }

    /// The structural fingerprint: `(groupId, artifactId, version, parent,
    /// propertyOverrides, dependencyOverrides)`. Two partials with equal
    /// fingerprints must produce equal resolved models.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut properties: Vec<(String, String)> = self
            .properties_override
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        properties.sort();

        let mut dependency_overrides: Vec<(DependencyKey, String)> = self
            .dependency_management
            .iter()
            .map(|(k, v)| (k.clone(), v.version.clone()))
            .collect();
        dependency_overrides.sort();

        Fingerprint {
            coordinate: self.coordinate.clone(),
            parent: self.parent.clone(),
            property_overrides: properties,
            dependency_overrides,
        }
    }
}

/// The literal six-tuple fingerprint, retained for tests and callers that
/// want to verify the memoization invariant directly, even though the live
/// cache is keyed by `Coordinate` alone (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub coordinate: Coordinate,
    pub parent: Option<Coordinate>,
    pub property_overrides: Vec<(String, String)>,
    pub dependency_overrides: Vec<(DependencyKey, String)>,
}

/// Per-resolution-subtree accumulator. `properties` and `managed_dependencies`
/// are derived recursively per POM and are therefore cheap to rebuild per
/// level; `resolved_dependencies` is the one piece of state that must be
/// shared and mutated live across an entire dependency-DAG traversal, since
/// conflict resolution is inherently about visitation order within a single
/// top-level resolution.
#[derive(Clone)]
pub struct EffectiveContext {
    pub properties: HashMap<String, String>,
    pub managed_dependencies: HashMap<DependencyKey, ManagedDependency>,
    pub resolved_dependencies: Rc<RefCell<HashMap<DependencyKey, ResolvedDependency>>>,
}

impl EffectiveContext {
    /// A context for a freshly started dependency-resolution tree (the
    /// public entry point, or a BOM import both start with nothing
    /// resolved yet).
    pub fn fresh(properties: HashMap<String, String>) -> Self {
        EffectiveContext {
            properties,
            managed_dependencies: HashMap::new(),
            resolved_dependencies: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// A context for recursing into a direct dependency's own subtree: only
    /// the resolved-dependencies map is inherited, not the properties map
    /// (properties are strictly per-POM-tree).
    pub fn refresh_for_dependency(&self, properties: HashMap<String, String>) -> Self {
        EffectiveContext {
            properties,
            managed_dependencies: HashMap::new(),
            resolved_dependencies: Rc::clone(&self.resolved_dependencies),
        }
    }
}

/// The final, immutable resolved model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pom {
    pub coordinate: Coordinate,
    pub parent: Option<Coordinate>,
    pub dependencies: Vec<ResolvedDependency>,
    pub dependency_management: HashMap<DependencyKey, ManagedDependency>,
    pub licenses: Vec<License>,
    /// Effective repositories in precedence order: user-settings, then this
    /// POM's own declarations, then its parent chain's, child-before-parent
    /// and de-duplicated. The well-known central repository is appended by
    /// the `Downloader` itself, not stored here.
    pub repositories: Vec<EffectiveRepository>,
    pub properties_own: HashMap<String, String>,
    pub properties_override: HashMap<String, String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub packaging: Option<String>,
    pub is_snapshot: bool,
}

impl Pom {
    /// No resolved Pom may contain an unresolved placeholder anywhere in
    /// its coordinate fields.
    pub fn has_pure_coordinates(&self) -> bool {
        !crate::placeholder::contains_placeholder(&self.coordinate.group_id)
            && !crate::placeholder::contains_placeholder(&self.coordinate.artifact_id)
            && !crate::placeholder::contains_placeholder(&self.coordinate.version)
    }
}
