//! Compose the dependency-management table for one POM level: `Define`
//! entries plus `scope=import` BOM expansion, unioned with the parent
//! chain's already-composed table.
//!
//! Each managed dependency's coordinates are interpolated, the
//! `scope=import` entries are resolved as full artifacts and their own
//! dependency-management table folded in, and every entry requires an
//! explicit version (a BOM reference with no version is reported and
//! skipped rather than guessed at).

use std::collections::HashMap;
use std::rc::Rc;

use crate::cache::Resolver;
use crate::context::ExecutionContext;
use crate::coordinate::{Coordinate, DependencyKey, Scope};
use crate::downloader::Downloader;
use crate::error::ResolverError;
use crate::model::{ManagedDependency, ManagedDependencySource};
use crate::placeholder::evaluate;
use crate::raw::RawPom;
use crate::repository::EffectiveRepository;
use crate::resolver::DependencyState;

impl Resolver {
    /// Builds the composed `(group, artifact) -> ManagedDependency` table
    /// for `raw`, folding its own entries first-write-wins and then
    /// unioning in `parent_management` for any keys still missing, giving
    /// the nearest-to-child definition precedence.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn compose_dependency_management(
        &mut self,
        raw: &Rc<dyn RawPom>,
        own_coordinate: &Coordinate,
        properties: &HashMap<String, String>,
        parent_management: &HashMap<DependencyKey, ManagedDependency>,
        repositories: &[EffectiveRepository],
        downloader: &dyn Downloader,
        ctx: &ExecutionContext,
    ) -> HashMap<DependencyKey, ManagedDependency> {
        let mut composed: HashMap<DependencyKey, ManagedDependency> = HashMap::new();
        let context_label = own_coordinate.to_string();

        let lookup = |key: &str| {
            ctx.process_overrides
                .get(key)
                .or_else(|| properties.get(key))
                .cloned()
        };

        for entry in raw.active_dependency_management(&ctx.active_profiles) {
            let (Some(group), Some(artifact)) = (entry.group_id.as_deref(), entry.artifact_id.as_deref())
            else {
                continue;
            };
            let group = evaluate(group, lookup);
            let artifact = evaluate(artifact, lookup);
            let key = DependencyKey::new(group.clone(), artifact.clone());

            let scope = match entry.scope.as_deref() {
                None => Scope::default(),
                Some(raw_scope) => match Scope::parse(raw_scope) {
                    Some(scope) => scope,
                    None => {
                        ctx.on_error.report(ResolverError::InvalidManagedScope {
                            context: "dependencyManagement",
                            key: key.to_string(),
                            scope: raw_scope.to_owned(),
                        });
                        continue;
                    }
                },
            };

            let raw_version = entry.version.as_deref().map(|v| evaluate(v, lookup));

            if scope == Scope::Import {
                let Some(version) = raw_version else {
                    ctx.on_error.report(ResolverError::BomMissingVersion {
                        key: key.to_string(),
                    });
                    continue;
                };
                let bom_coordinate = Coordinate::new(group, artifact, version);
                log::trace!("got a BOM artifact: {}", bom_coordinate);

                let bom_pom = self.resolve_internal(
                    &bom_coordinate,
                    None,
                    Some(own_coordinate),
                    repositories,
                    &Default::default(),
                    &DependencyState::fresh(),
                    downloader,
                    ctx,
                );
                if let Some(bom_pom) = bom_pom {
                    for (k, v) in &bom_pom.dependency_management {
                        composed.entry(k.clone()).or_insert_with(|| ManagedDependency {
                            source: ManagedDependencySource::Imported {
                                bom: bom_coordinate.clone(),
                            },
                            ..v.clone()
                        });
                    }
                }
                continue;
            }

            let Some(version) = raw_version else {
                ctx.on_error.report(ResolverError::PropertyUnresolvable {
                    context: context_label.clone(),
                    placeholder: format!("{key} version"),
                });
                continue;
            };
            if crate::placeholder::contains_placeholder(&version) {
                ctx.on_error.report(ResolverError::PropertyUnresolvable {
                    context: context_label.clone(),
                    placeholder: version,
                });
                continue;
            }

            composed.entry(key.clone()).or_insert(ManagedDependency {
                key,
                version,
                scope,
                r#type: entry.r#type.clone(),
                classifier: entry.classifier.clone(),
                exclusions: entry.exclusions.clone(),
                source: ManagedDependencySource::Defined,
            });
        }

        for (key, managed) in parent_management {
            composed.entry(key.clone()).or_insert_with(|| managed.clone());
        }

        composed
    }
}
