//! The `Resolver` struct and its memoization map.
//!
//! Keyed by `Coordinate` rather than the literal six-tuple fingerprint: the
//! fingerprint collapses to a function of the coordinate alone under this
//! resolver's recursive-composition design (see DESIGN.md).
//! [`crate::model::PartialPom::fingerprint`] remains available for callers
//! who want to check the invariant directly.

use std::collections::HashMap;
use std::rc::Rc;

use crate::coordinate::Coordinate;
use crate::model::Pom;

/// Owns the memoization map for one resolver lifetime. Not `Sync`: a
/// `Resolver` must not be shared across threads without external
/// synchronization.
#[derive(Default)]
pub struct Resolver {
    cache: HashMap<Coordinate, Rc<Pom>>,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver::default()
    }

    pub(crate) fn cache_get(&self, coordinate: &Coordinate) -> Option<Rc<Pom>> {
        self.cache.get(coordinate).cloned()
    }

    pub(crate) fn cache_put(&mut self, coordinate: Coordinate, pom: Rc<Pom>) {
        self.cache.insert(coordinate, pom);
    }

    /// Exposed for tests/tooling that want to confirm memoization happened
    /// without re-resolving.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
