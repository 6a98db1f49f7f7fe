//! A fixed-point Maven POM resolver: coordinates, inherited properties,
//! dependency management, and the transitive dependency graph, normalized
//! and cacheable.
//!
//! # Quick Start
//!
//! ```no_run
//! use pom_resolver::{default_impl::*, *};
//!
//! let coordinate = Coordinate::new(
//!     "com.walmartlabs.concord.plugins.basic",
//!     "smtp-tasks",
//!     "1.76.1",
//! );
//!
//! let sink = LoggingErrorSink;
//! let ctx = ExecutionContext::new(&sink);
//! let downloader = DefaultDownloader;
//!
//! let mut resolver = Resolver::new();
//! let pom = resolver.resolve(&coordinate, &downloader, &ctx).unwrap();
//! println!("{} depends on {} artifacts", pom.coordinate, pom.dependencies.len());
//! ```
//!
//! `resolve` requires a [`Downloader`] and an [`ExecutionContext`]. The
//! [`default_impl`] module (behind the `default-impl` feature) ships a
//! `ureq`/`roxmltree`-based implementation of both, but callers may plug in
//! their own.

mod cache;
mod context;
mod coordinate;
mod dependency;
mod dependency_management;
#[cfg(feature = "default-impl")]
pub mod default_impl;
mod downloader;
mod error;
mod model;
mod parent_chain;
mod placeholder;
mod raw;
mod repository;
mod resolver;

pub use cache::Resolver;
pub use context::{Credentials, ExecutionContext};
pub use coordinate::{Coordinate, DependencyKey, Scope};
pub use downloader::Downloader;
pub use error::{CollectingErrorSink, ErrorSink, LoggingErrorSink, ResolverError};
pub use model::{EffectiveContext, Fingerprint, ManagedDependency, ManagedDependencySource, Pom, ResolvedDependency};
pub use raw::{License, RawCoordinates, RawDependency, RawExclusion, RawParentRef, RawPom, RawRepository};
pub use repository::EffectiveRepository;
