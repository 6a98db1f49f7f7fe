//! Per-level composition for the parent chain walk.
//!
//! The actual recursion (fetching the parent, calling back into the full
//! resolution pipeline for it) lives in `resolver.rs`, which owns the cache
//! and the downloader call. This module holds the pure, single-level logic:
//! folding a RawPom's own properties, and composing the effective property
//! view against an already-resolved parent `Pom`.

use std::collections::HashMap;
use std::rc::Rc;

use crate::coordinate::Coordinate;
use crate::model::{PartialPom, Pom};
use crate::raw::RawPom;
use crate::repository::EffectiveRepository;

/// Build the `PartialPom` for one level, given its own declared properties,
/// its already fully combined repository list (user-settings, this level's
/// own declarations, then the parent's own accumulated list), and its
/// (already fully resolved) parent `Pom`, if any. Does not touch
/// dependency-management or resolved-dependencies; those are composed
/// afterward.
///
/// The effective property view is this level's own properties, folded
/// first-write-wins, unioned with the parent's already-resolved effective
/// properties for any keys still missing. That union is exactly what
/// `properties_override` holds here: every parent-derived key this level
/// didn't itself declare.
pub fn compose_level(
    raw: Rc<dyn RawPom>,
    coordinate: Coordinate,
    own_properties: HashMap<String, String>,
    parent: Option<&Pom>,
    repositories: Vec<EffectiveRepository>,
) -> PartialPom {
    let properties_override = match parent {
        Some(parent_pom) => {
            let mut inherited = HashMap::new();
            for (k, v) in parent_pom
                .properties_override
                .iter()
                .chain(parent_pom.properties_own.iter())
            {
                if !own_properties.contains_key(k) {
                    inherited.entry(k.clone()).or_insert_with(|| v.clone());
                }
            }
            inherited
        }
        None => HashMap::new(),
    };

    PartialPom {
        coordinate,
        parent: parent.map(|p| p.coordinate.clone()),
        repositories,
        properties_own: own_properties,
        properties_override,
        dependency_management: HashMap::new(),
        resolved_dependencies: Vec::new(),
        raw,
    }
}
