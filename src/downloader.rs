//! The external fetch boundary: operates in terms of coordinates and
//! effective repositories rather than a single pre-built URL string, and
//! returns an already-parsed [`RawPom`](crate::raw::RawPom) rather than raw
//! bytes. Fetching and parsing are folded into one trait since every
//! default implementation needs both together, and a caller supplying a
//! custom `Downloader` is exactly the caller who wants to control parsing
//! too.

use std::rc::Rc;

use crate::context::ExecutionContext;
use crate::coordinate::Coordinate;
use crate::raw::RawPom;
use crate::repository::EffectiveRepository;

/// Fetches and parses a POM descriptor for a coordinate. Implementations are
/// expected to try `repositories` in order and stop at the first hit.
///
/// Returns `Ok(None)` when the artifact genuinely does not exist in any of
/// the given repositories (a normal, expected outcome, e.g. an optional
/// parent lookup) and `Err` only when the fetch itself failed (network
/// error, malformed response); see [`crate::error::ResolverError::DownloaderFailure`].
pub trait Downloader {
    fn download(
        &self,
        coordinate: &Coordinate,
        relative_path: Option<&str>,
        containing_pom: Option<&Coordinate>,
        repositories: &[EffectiveRepository],
        ctx: &ExecutionContext,
    ) -> Result<Option<Rc<dyn RawPom>>, String>;
}
