//! Direct dependency composition and version conflict resolution.
//!
//! Implements Maven's nearest-wins rule: every sibling in this level's own
//! dependency list is registered against the shared winner map before any
//! of them is recursed into, so a shallow sibling declared later in the XML
//! always claims its key ahead of a deeper transitive request, regardless
//! of declaration order. Once a key is claimed, every later request for it
//! (at this level or any deeper one reached through recursion) reuses the
//! existing entry instead of overwriting it.

use std::rc::Rc;

use crate::cache::Resolver;
use crate::context::ExecutionContext;
use crate::coordinate::{Coordinate, DependencyKey, Scope};
use crate::downloader::Downloader;
use crate::model::{EffectiveContext, ResolvedDependency};
use crate::placeholder::evaluate;
use crate::raw::RawPom;
use crate::repository::EffectiveRepository;
use crate::resolver::DependencyState;

impl Resolver {
    /// Composes this level's direct dependencies against `eff_ctx`,
    /// recursing into each one's own subtree so transitive dependencies
    /// feed into the same shared conflict-resolution map.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn compose_dependencies(
        &mut self,
        raw: &Rc<dyn RawPom>,
        own_coordinate: &Coordinate,
        eff_ctx: &EffectiveContext,
        dependency_state: &DependencyState,
        repositories: &[EffectiveRepository],
        downloader: &dyn Downloader,
        ctx: &ExecutionContext,
    ) -> Vec<ResolvedDependency> {
        let lookup = |key: &str| {
            ctx.process_overrides
                .get(key)
                .or_else(|| eff_ctx.properties.get(key))
                .cloned()
        };

        // Pass 1: claim a winner for every one of this level's own entries
        // against the shared map before recursing into any of them. This is
        // what makes nearest-wins independent of XML declaration order: a
        // sibling declared after another still registers at the same depth,
        // ahead of whatever either sibling's subtree would otherwise claim
        // first under plain depth-first recursion.
        let mut own_direct = Vec::new();
        for raw_dep in raw.active_dependencies(&ctx.active_profiles) {
            let (Some(group), Some(artifact)) =
                (raw_dep.group_id.as_deref(), raw_dep.artifact_id.as_deref())
            else {
                continue;
            };
            let group = evaluate(group, lookup);
            let artifact = evaluate(artifact, lookup);
            let key = DependencyKey::new(group.clone(), artifact.clone());

            let scope = match raw_dep.scope.as_deref() {
                None => Scope::default(),
                Some(raw_scope) => match Scope::parse(raw_scope) {
                    Some(scope) => scope,
                    None => continue,
                },
            };

            let requested_version = raw_dep
                .version
                .as_deref()
                .map(|v| evaluate(v, lookup))
                .or_else(|| eff_ctx.managed_dependencies.get(&key).map(|m| m.version.clone()));

            let resolved_entry = {
                let mut winners = eff_ctx.resolved_dependencies.borrow_mut();
                if let Some(existing) = winners.get(&key) {
                    existing.clone()
                } else {
                    let Some(version) = requested_version.clone() else {
                        continue;
                    };
                    let resolved = ResolvedDependency {
                        key: key.clone(),
                        resolved_version: version,
                        requested_version: requested_version.clone(),
                        scope,
                        r#type: raw_dep.r#type.clone(),
                        optional: raw_dep.optional,
                        classifier: raw_dep.classifier.clone(),
                        exclusions: raw_dep.exclusions.clone(),
                    };
                    winners.insert(key.clone(), resolved.clone());
                    resolved
                }
            };

            own_direct.push((resolved_entry, group, artifact));
        }

        // Pass 2: now that every sibling's winner is settled, recurse into
        // each one's own subtree.
        for (resolved_entry, group, artifact) in &own_direct {
            let dep_coordinate = Coordinate::new(group.clone(), artifact.clone(), resolved_entry.resolved_version.clone());
            if dependency_state.in_progress.contains(&dep_coordinate) {
                log::trace!("skipping already-in-progress dependency {}", dep_coordinate);
                continue;
            }

            let extended_state = dependency_state.extended(&dep_coordinate);
            self.resolve_internal(
                &dep_coordinate,
                None,
                Some(own_coordinate),
                repositories,
                &Default::default(),
                &extended_state,
                downloader,
                ctx,
            );
        }

        own_direct.into_iter().map(|(resolved_entry, _, _)| resolved_entry).collect()
    }
}
