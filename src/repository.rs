//! Turns raw, possibly-placeholder-bearing `<repository>` entries into
//! effective repositories: URL evaluation/validation, mirror rewriting,
//! credential attachment, and the repository precedence contract
//! (`user-settings ++ pom-declared (child-before-parent, deduplicated) ++
//! central`).

use std::collections::HashMap;

use crate::context::{Credentials, ExecutionContext};
use crate::error::{ErrorSink, ResolverError};
use crate::placeholder::evaluate;
use crate::raw::RawRepository;

/// A repository with its URL fully evaluated and validated, mirror-rewritten,
/// and credentials attached if any are configured for its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveRepository {
    pub id: Option<String>,
    pub url: String,
    pub credentials: Option<Credentials>,
}

/// Evaluate one raw repository entry against `properties`/`process_overrides`,
/// validate the resulting URL, and apply mirror/credential rewrites in that
/// order. `None` means the entry was rejected (reported to `sink`) and
/// should be skipped rather than included.
fn evaluate_one(
    raw: &RawRepository,
    properties: &HashMap<String, String>,
    process_overrides: &HashMap<String, String>,
    mirrors: &HashMap<String, String>,
    credentials: &HashMap<String, Credentials>,
    context: &str,
    sink: &dyn ErrorSink,
) -> Option<EffectiveRepository> {
    let lookup = |key: &str| {
        process_overrides
            .get(key)
            .or_else(|| properties.get(key))
            .cloned()
    };
    let evaluated_url = evaluate(&raw.url, lookup);

    if url::Url::parse(&evaluated_url).is_err() {
        sink.report(ResolverError::MalformedRepositoryUrl {
            context: context.to_owned(),
            url: evaluated_url,
        });
        return None;
    }

    let rewritten_url = mirror_for(raw.id.as_deref(), mirrors)
        .cloned()
        .unwrap_or(evaluated_url);

    let creds = raw
        .id
        .as_deref()
        .and_then(|id| credentials.get(id))
        .cloned();

    Some(EffectiveRepository {
        id: raw.id.clone(),
        url: rewritten_url,
        credentials: creds,
    })
}

/// A repo-id-specific mirror entry wins over a `*` wildcard entry.
fn mirror_for<'a>(id: Option<&str>, mirrors: &'a HashMap<String, String>) -> Option<&'a String> {
    id.and_then(|id| mirrors.get(id)).or_else(|| mirrors.get("*"))
}

/// Evaluate a whole list of raw repository entries declared at one POM
/// level (or the user-settings level), dropping malformed ones.
pub fn evaluate_repositories(
    raw_repos: &[RawRepository],
    properties: &HashMap<String, String>,
    ctx: &ExecutionContext,
    context: &str,
) -> Vec<EffectiveRepository> {
    raw_repos
        .iter()
        .filter_map(|raw| {
            evaluate_one(
                raw,
                properties,
                &ctx.process_overrides,
                &ctx.mirrors,
                &ctx.credentials,
                context,
                ctx.on_error,
            )
        })
        .collect()
}

/// Flatten already-evaluated repository lists in precedence order
/// (user-settings first, then each POM level child-before-parent), keeping
/// only the first occurrence of each `(id, url)` pair. The well-known
/// central repository is appended by the `Downloader` itself, not here:
/// this function only produces the POM-and-settings-derived portion of
/// the list.
pub fn combine(levels: Vec<Vec<EffectiveRepository>>) -> Vec<EffectiveRepository> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for level in levels {
        for repo in level {
            let key = (repo.id.clone(), repo.url.clone());
            if seen.insert(key) {
                out.push(repo);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoggingErrorSink;

    fn ctx_with<'a>(
        sink: &'a dyn ErrorSink,
        mirrors: HashMap<String, String>,
        credentials: HashMap<String, Credentials>,
    ) -> ExecutionContext<'a> {
        let mut ctx = ExecutionContext::new(sink);
        ctx.mirrors = mirrors;
        ctx.credentials = credentials;
        ctx
    }

    #[test]
    fn evaluates_placeholders_in_repository_urls() {
        let sink = LoggingErrorSink;
        let ctx = ctx_with(&sink, HashMap::new(), HashMap::new());
        let mut props = HashMap::new();
        props.insert("repo.host".to_owned(), "example.com".to_owned());
        let raw = vec![RawRepository {
            id: Some("central".into()),
            url: "https://${repo.host}/maven2".into(),
        }];
        let result = evaluate_repositories(&raw, &props, &ctx, "test");
        assert_eq!(result[0].url, "https://example.com/maven2");
    }

    #[test]
    fn rejects_malformed_urls() {
        let sink = LoggingErrorSink;
        let ctx = ctx_with(&sink, HashMap::new(), HashMap::new());
        let raw = vec![RawRepository {
            id: Some("bad".into()),
            url: "not a url".into(),
        }];
        let result = evaluate_repositories(&raw, &HashMap::new(), &ctx, "test");
        assert!(result.is_empty());
    }

    #[test]
    fn specific_mirror_wins_over_wildcard() {
        let sink = LoggingErrorSink;
        let mut mirrors = HashMap::new();
        mirrors.insert("*".to_owned(), "https://wildcard.example.com".to_owned());
        mirrors.insert("central".to_owned(), "https://specific.example.com".to_owned());
        let ctx = ctx_with(&sink, mirrors, HashMap::new());
        let raw = vec![RawRepository {
            id: Some("central".into()),
            url: "https://repo.maven.apache.org/maven2".into(),
        }];
        let result = evaluate_repositories(&raw, &HashMap::new(), &ctx, "test");
        assert_eq!(result[0].url, "https://specific.example.com");
    }

    #[test]
    fn combine_preserves_precedence_and_dedups_first_occurrence() {
        let a = EffectiveRepository {
            id: Some("central".into()),
            url: "https://a.example.com".into(),
            credentials: None,
        };
        let dup = EffectiveRepository {
            id: Some("central".into()),
            url: "https://a.example.com".into(),
            credentials: None,
        };
        let b = EffectiveRepository {
            id: Some("other".into()),
            url: "https://b.example.com".into(),
            credentials: None,
        };
        let combined = combine(vec![vec![a.clone()], vec![dup, b.clone()]]);
        assert_eq!(combined, vec![a, b]);
    }
}
