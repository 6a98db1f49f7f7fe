//! Orchestration: the state machine wiring coordinate normalization,
//! repository evaluation, parent-chain composition, dependency management,
//! and direct-dependency resolution together into one recursive
//! `resolve_internal`, plus the public entry point.
//!
//! Fetching is [`fetch_raw`]; the recursion (parent, then dependency
//! management's BOM imports, then direct dependencies) is
//! [`Resolver::resolve_internal`] calling back into itself.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::cache::Resolver;
use crate::context::ExecutionContext;
use crate::coordinate::{self, Coordinate};
use crate::downloader::Downloader;
use crate::error::ResolverError;
use crate::model::{EffectiveContext, Pom};
use crate::raw::RawPom;
use crate::repository::{self, EffectiveRepository};

/// The one piece of state that must be threaded live through an entire
/// dependency-DAG traversal: the shared conflict-resolution "winner" map,
/// and the set of coordinates currently in progress on this path (the
/// dependency-DAG analogue of the parent chain's ancestor set).
#[derive(Clone)]
pub(crate) struct DependencyState {
    pub resolved: Rc<RefCell<std::collections::HashMap<crate::coordinate::DependencyKey, crate::model::ResolvedDependency>>>,
    pub in_progress: HashSet<Coordinate>,
}

impl DependencyState {
    /// A state for a freshly started dependency-resolution tree: the public
    /// entry point, or a BOM import, both reset this state.
    pub fn fresh() -> Self {
        DependencyState {
            resolved: Rc::new(RefCell::new(std::collections::HashMap::new())),
            in_progress: HashSet::new(),
        }
    }

    /// Extend the in-progress set with `coordinate` while still sharing the
    /// same resolved-dependencies map, for recursing into one direct
    /// dependency's own subtree.
    pub fn extended(&self, coordinate: &Coordinate) -> Self {
        let mut in_progress = self.in_progress.clone();
        in_progress.insert(coordinate.clone());
        DependencyState {
            resolved: Rc::clone(&self.resolved),
            in_progress,
        }
    }
}

/// Repositories configured ahead of any POM (the execution context's own
/// repository list), evaluated against no properties at all since
/// user-settings repositories are not expected to reference POM properties.
fn initial_repositories(ctx: &ExecutionContext) -> Vec<EffectiveRepository> {
    repository::evaluate_repositories(
        &ctx.user_repositories,
        &std::collections::HashMap::new(),
        ctx,
        "user-settings",
    )
}

/// Download and parse a coordinate, normalizing `Ok(None)` ("not found",
/// tolerated silently) and `Err` (reported, then treated as absent) into a
/// single `Option`.
fn fetch_raw(
    coordinate: &Coordinate,
    relative_path: Option<&str>,
    containing_pom: Option<&Coordinate>,
    repositories: &[EffectiveRepository],
    downloader: &dyn Downloader,
    ctx: &ExecutionContext,
) -> Option<Rc<dyn RawPom>> {
    log::debug!("fetching {}...", coordinate);
    match downloader.download(coordinate, relative_path, containing_pom, repositories, ctx) {
        Ok(found) => found,
        Err(cause) => {
            ctx.on_error.report(ResolverError::DownloaderFailure {
                coordinate: coordinate.clone(),
                including: containing_pom
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "<root>".to_owned()),
                cause,
            });
            None
        }
    }
}

impl Resolver {
    /// Public entry point: resolve `coordinate` to its fully evaluated
    /// [`Pom`], using `downloader` for every fetch and `ctx` for
    /// repositories/mirrors/credentials/profiles/overrides/error reporting.
    /// Returns `None` only if the artifact itself is absent, its own
    /// coordinates can't be normalized, or its parent chain fails.
    pub fn resolve(
        &mut self,
        coordinate: &Coordinate,
        downloader: &dyn Downloader,
        ctx: &ExecutionContext,
    ) -> Option<Rc<Pom>> {
        let repositories = initial_repositories(ctx);
        self.resolve_internal(
            coordinate,
            None,
            None,
            &repositories,
            &HashSet::new(),
            &DependencyState::fresh(),
            downloader,
            ctx,
        )
    }

    /// The full per-artifact pipeline: cache check, fetch, normalize,
    /// parent-cycle check, parent-chain recursion, dependency management
    /// composition, direct dependency composition, cache insert.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn resolve_internal(
        &mut self,
        coordinate_hint: &Coordinate,
        relative_path: Option<&str>,
        containing_pom: Option<&Coordinate>,
        repositories: &[EffectiveRepository],
        parent_ancestors: &HashSet<Coordinate>,
        dependency_state: &DependencyState,
        downloader: &dyn Downloader,
        ctx: &ExecutionContext,
    ) -> Option<Rc<Pom>> {
        if let Some(cached) = self.cache_get(coordinate_hint) {
            log::debug!("returning from cache {}...", coordinate_hint);
            return Some(cached);
        }

        let raw = fetch_raw(coordinate_hint, relative_path, containing_pom, repositories, downloader, ctx)?;

        let own_properties = raw.active_properties(&ctx.active_profiles);
        let parent_ref = raw.parent();

        let coordinate = coordinate::normalize(
            &coordinate_hint.to_string(),
            &raw.coordinates(),
            &own_properties,
            &ctx.process_overrides,
            parent_ref.as_ref(),
            ctx.on_error,
        )?;

        if let Some(cached) = self.cache_get(&coordinate) {
            return Some(cached);
        }

        if parent_ancestors.contains(&coordinate) {
            ctx.on_error.report(ResolverError::ParentCycle {
                coordinate: coordinate.clone(),
            });
            return None;
        }

        let repos_own = repository::evaluate_repositories(
            &raw.active_repositories(&ctx.active_profiles),
            &own_properties,
            ctx,
            &coordinate.to_string(),
        );
        // Repositories available to locate the parent itself: user-settings
        // plus this level's own declarations. The parent's own repositories
        // aren't in scope yet (the parent hasn't been fetched), matching
        // Maven's bootstrap order.
        let repos_for_parent_fetch = repository::combine(vec![initial_repositories(ctx), repos_own.clone()]);

        // A declared parent that cannot be resolved, whether it loops back
        // into this chain or is simply absent, takes this whole level down
        // with it. Without the parent's properties and dependency
        // management a partial result would be silently wrong, not just
        // incomplete.
        let parent_pom = match &parent_ref {
            Some(parent_ref) => {
                let parent_coordinate = Coordinate::new(
                    parent_ref.group_id.clone(),
                    parent_ref.artifact_id.clone(),
                    parent_ref.version.clone(),
                );
                if parent_ancestors.contains(&parent_coordinate) {
                    ctx.on_error.report(ResolverError::ParentCycle {
                        coordinate: parent_coordinate.clone(),
                    });
                    return None;
                }
                let mut extended_ancestors = parent_ancestors.clone();
                extended_ancestors.insert(coordinate.clone());
                log::trace!("walking up to parent {}", parent_coordinate);
                let resolved = self.resolve_internal(
                    &parent_coordinate,
                    parent_ref.relative_path.as_deref(),
                    Some(&coordinate),
                    &repos_for_parent_fetch,
                    &extended_ancestors,
                    &DependencyState::fresh(),
                    downloader,
                    ctx,
                );
                Some(resolved?)
            }
            None => None,
        };

        // The full precedence list for everything below this point (BOM
        // imports, direct dependencies, and whatever this POM hands down to
        // a child as its own "parent repositories"): user-settings, then
        // this level's own declarations, then the parent's own already
        // accumulated list, child-before-parent and de-duplicated.
        let repos_for_this_level = repository::combine(vec![
            initial_repositories(ctx),
            repos_own.clone(),
            parent_pom.as_deref().map(|p| p.repositories.clone()).unwrap_or_default(),
        ]);

        let mut partial = crate::parent_chain::compose_level(
            Rc::clone(&raw),
            coordinate.clone(),
            own_properties,
            parent_pom.as_deref(),
            repos_for_this_level.clone(),
        );

        let properties_view = partial.effective_properties();
        let parent_management = parent_pom
            .as_deref()
            .map(|p| p.dependency_management.clone())
            .unwrap_or_default();

        partial.dependency_management = self.compose_dependency_management(
            &raw,
            &coordinate,
            &properties_view,
            &parent_management,
            &repos_for_this_level,
            downloader,
            ctx,
        );

        let eff_ctx = EffectiveContext {
            properties: properties_view,
            managed_dependencies: partial.dependency_management.clone(),
            resolved_dependencies: Rc::clone(&dependency_state.resolved),
        };

        partial.resolved_dependencies = self.compose_dependencies(
            &raw,
            &coordinate,
            &eff_ctx,
            dependency_state,
            &repos_for_this_level,
            downloader,
            ctx,
        );

        let pom = Rc::new(Pom {
            coordinate: partial.coordinate.clone(),
            parent: partial.parent.clone(),
            dependencies: partial.resolved_dependencies,
            dependency_management: partial.dependency_management,
            licenses: raw.licenses(),
            repositories: partial.repositories,
            properties_own: partial.properties_own,
            properties_override: partial.properties_override,
            name: raw.name(),
            description: raw.description(),
            packaging: raw.packaging(),
            is_snapshot: raw.is_snapshot(),
        });

        log::trace!("caching {}", coordinate);
        self.cache_put(coordinate, Rc::clone(&pom));

        Some(pom)
    }
}
