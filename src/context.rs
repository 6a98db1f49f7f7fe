//! The execution-scoped handle: repositories, mirrors, credentials, active
//! profiles, process-level property overrides, and the error sink. Modeled
//! as an explicit immutable handle threaded through every component rather
//! than thread-local or global state.

use std::collections::HashMap;

use crate::error::ErrorSink;
use crate::raw::RawRepository;

/// Username/password (or token) for a repository id, as configured outside
/// any POM (the Maven `settings.xml` `<servers>` analogue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Everything a resolution run needs that isn't part of any individual POM:
/// user-level repositories, mirror rewrites, credentials, the set of active
/// profile names, process-level property overrides (`-D` style), and where
/// to send recoverable errors. Built once by the caller and threaded through
/// by reference for the lifetime of a single `resolve()` call.
pub struct ExecutionContext<'a> {
    /// Repositories configured ahead of any POM-declared ones (highest
    /// precedence in the repository ordering).
    pub user_repositories: Vec<RawRepository>,
    /// `mirrorOf` id -> replacement URL.
    pub mirrors: HashMap<String, String>,
    /// Repository id -> credentials.
    pub credentials: HashMap<String, Credentials>,
    pub active_profiles: Vec<String>,
    /// Process/environment-level property overrides (`-Drevision=...`),
    /// highest priority in the placeholder lookup chain.
    pub process_overrides: HashMap<String, String>,
    pub on_error: &'a dyn ErrorSink,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(on_error: &'a dyn ErrorSink) -> Self {
        ExecutionContext {
            user_repositories: Vec::new(),
            mirrors: HashMap::new(),
            credentials: HashMap::new(),
            active_profiles: Vec::new(),
            process_overrides: HashMap::new(),
            on_error,
        }
    }
}
