//! Error kinds reported by the resolver and the sink they flow through.

use std::fmt;

use crate::coordinate::Coordinate;

/// Every non-fatal issue the resolver can encounter. None of these are ever
/// thrown from the public surface; they are handed to an [`ErrorSink`] and
/// the resolver keeps going with a best-effort partial result.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// group/artifact/version still contains a placeholder, or is absent after inheritance.
    #[error("unresolved coordinate for {context}: {field} is missing or still contains '${{'")]
    UnresolvedCoordinate { context: String, field: &'static str },

    /// A coordinate reappeared while walking the parent chain.
    #[error("parent cycle detected: {coordinate} already on the path to the root")]
    ParentCycle { coordinate: Coordinate },

    /// A repository URL is not a valid URL after placeholder substitution.
    #[error("malformed repository url in {context}: {url}")]
    MalformedRepositoryUrl { context: String, url: String },

    /// A `<scope>` token does not match a recognized Maven scope.
    #[error("invalid scope '{scope}' on {context} {key}")]
    InvalidManagedScope {
        context: &'static str,
        key: String,
        scope: String,
    },

    /// A `scope=import` managed dependency had no explicit version.
    #[error("BOM import {key} has no version")]
    BomMissingVersion { key: String },

    /// A required placeholder (coordinates, repository URL) could not be expanded.
    #[error("unresolvable property '{placeholder}' in {context}")]
    PropertyUnresolvable { context: String, placeholder: String },

    /// The external downloader failed (as opposed to returning "not found").
    #[error("downloader failed fetching {coordinate} (included from {including}): {cause}")]
    DownloaderFailure {
        coordinate: Coordinate,
        including: String,
        cause: String,
    },
}

/// A capability to report a [`ResolverError`] without the resolver itself
/// deciding what happens to it (log it, collect it, turn it into a CLI
/// diagnostic...). Passed by value/reference into every component that can
/// fail locally and recover.
pub trait ErrorSink {
    fn report(&self, error: ResolverError);
}

impl<F> ErrorSink for F
where
    F: Fn(ResolverError),
{
    fn report(&self, error: ResolverError) {
        self(error)
    }
}

/// An [`ErrorSink`] that logs every error at `warn` level via the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingErrorSink;

impl ErrorSink for LoggingErrorSink {
    fn report(&self, error: ResolverError) {
        log::warn!("{error}");
    }
}

/// An [`ErrorSink`] that collects every error it sees, for tests and callers
/// that want to inspect the full audit log after a resolution.
#[derive(Debug, Default)]
pub struct CollectingErrorSink {
    errors: std::cell::RefCell<Vec<String>>,
}

impl CollectingErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.errors.into_inner()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl ErrorSink for CollectingErrorSink {
    fn report(&self, error: ResolverError) {
        self.errors.borrow_mut().push(error.to_string());
    }
}

impl fmt::Debug for dyn ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<dyn ErrorSink>")
    }
}
