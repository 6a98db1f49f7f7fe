//! Default implementations of the external boundary traits, behind the
//! `default-impl` feature.
//!
//! `parse_pom_xml`/`XmlRawPom` parse a POM document into the full `RawPom`
//! accessor surface: profiles, licenses, snapshot detection, and
//! placeholder-name enumeration. `DefaultDownloader` tries each repository
//! it is handed, in order, stopping at the first hit.

use std::collections::HashMap;
use std::rc::Rc;

use crate::context::ExecutionContext;
use crate::coordinate::Coordinate;
use crate::downloader::Downloader;
use crate::raw::{License, RawCoordinates, RawDependency, RawExclusion, RawParentRef, RawPom, RawRepository};
use crate::repository::EffectiveRepository;

fn node<'a, 'input: 'a>(
    parent: &'input roxmltree::Node,
    tag_name: &'a str,
) -> Option<roxmltree::Node<'a, 'input>> {
    parent
        .children()
        .find(|child| child.is_element() && child.has_tag_name(tag_name))
}

fn node_text<'a, 'input: 'a>(parent: &'input roxmltree::Node, tag_name: &'a str) -> Option<String> {
    let n = node(parent, tag_name)?;
    n.text().map(|t| t.to_owned())
}

fn children<'a, 'input: 'a>(
    parent: &'input roxmltree::Node,
    tag_name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    parent
        .children()
        .filter(move |child| child.is_element() && child.has_tag_name(tag_name))
}

fn parse_coordinates(n: &roxmltree::Node) -> RawCoordinates {
    RawCoordinates {
        group_id: node_text(n, "groupId"),
        artifact_id: node_text(n, "artifactId"),
        version: node_text(n, "version"),
    }
}

fn parse_parent(project_node: &roxmltree::Node) -> Option<RawParentRef> {
    let n = node(project_node, "parent")?;
    Some(RawParentRef {
        group_id: node_text(&n, "groupId")?,
        artifact_id: node_text(&n, "artifactId")?,
        version: node_text(&n, "version")?,
        relative_path: node_text(&n, "relativePath"),
    })
}

fn parse_exclusions(dep_node: &roxmltree::Node) -> Vec<RawExclusion> {
    match node(dep_node, "exclusions") {
        Some(n) => children(&n, "exclusion")
            .filter_map(|excl| {
                Some(RawExclusion {
                    group_id: node_text(&excl, "groupId")?,
                    artifact_id: node_text(&excl, "artifactId")?,
                })
            })
            .collect(),
        None => Vec::new(),
    }
}

fn parse_dependency(n: &roxmltree::Node) -> RawDependency {
    RawDependency {
        group_id: node_text(n, "groupId"),
        artifact_id: node_text(n, "artifactId"),
        version: node_text(n, "version"),
        scope: node_text(n, "scope"),
        r#type: node_text(n, "type"),
        classifier: node_text(n, "classifier"),
        optional: node_text(n, "optional").as_deref() == Some("true"),
        exclusions: parse_exclusions(n),
    }
}

fn parse_dependencies(parent: &roxmltree::Node) -> Vec<RawDependency> {
    match node(parent, "dependencies") {
        Some(n) => children(&n, "dependency").map(|child| parse_dependency(&child)).collect(),
        None => Vec::new(),
    }
}

fn parse_dependency_management(parent: &roxmltree::Node) -> Vec<RawDependency> {
    match node(parent, "dependencyManagement") {
        Some(dm) => parse_dependencies(&dm),
        None => Vec::new(),
    }
}

fn parse_repositories(parent: &roxmltree::Node) -> Vec<RawRepository> {
    match node(parent, "repositories") {
        Some(n) => children(&n, "repository")
            .filter_map(|child| {
                Some(RawRepository {
                    id: node_text(&child, "id"),
                    url: node_text(&child, "url")?,
                })
            })
            .collect(),
        None => Vec::new(),
    }
}

fn parse_properties(parent: &roxmltree::Node) -> HashMap<String, String> {
    match node(parent, "properties") {
        Some(n) => n
            .children()
            .filter(|c| c.is_element())
            .filter_map(|c| c.text().map(|t| (c.tag_name().name().to_owned(), t.to_owned())))
            .collect(),
        None => HashMap::new(),
    }
}

fn parse_licenses(parent: &roxmltree::Node) -> Vec<License> {
    match node(parent, "licenses") {
        Some(n) => children(&n, "license")
            .map(|child| License {
                name: node_text(&child, "name"),
                url: node_text(&child, "url"),
            })
            .collect(),
        None => Vec::new(),
    }
}

/// One raw, potentially profile-guarded section. Unconditional data lives
/// outside `by_profile`; merging an active profile's contribution in is
/// the `active()` method below.
struct ProfileScoped<T> {
    unconditional: T,
    by_profile: HashMap<String, T>,
}

impl<T> ProfileScoped<T>
where
    T: Clone + Default + IntoIterator,
    T: Extend<<T as IntoIterator>::Item>,
{
    fn active(&self, active_profiles: &[String]) -> T {
        let mut merged = self.unconditional.clone();
        for profile in active_profiles {
            if let Some(extra) = self.by_profile.get(profile) {
                merged.extend(extra.clone());
            }
        }
        merged
    }
}

/// A `RawPom` backed by fully-parsed, owned data. Every accessor is a
/// cheap clone rather than a re-parse, since a `roxmltree::Document` can't
/// outlive the buffer it borrows from and `RawPom` implementations need to
/// be handed around as `Rc<dyn RawPom>` with no tied lifetime.
pub struct XmlRawPom {
    coordinates: RawCoordinates,
    parent: Option<RawParentRef>,
    properties: ProfileScoped<HashMap<String, String>>,
    repositories: ProfileScoped<Vec<RawRepository>>,
    dependency_management: ProfileScoped<Vec<RawDependency>>,
    dependencies: ProfileScoped<Vec<RawDependency>>,
    licenses: Vec<License>,
    name: Option<String>,
    description: Option<String>,
    packaging: Option<String>,
}

impl RawPom for XmlRawPom {
    fn coordinates(&self) -> RawCoordinates {
        self.coordinates.clone()
    }

    fn parent(&self) -> Option<RawParentRef> {
        self.parent.clone()
    }

    fn active_properties(&self, profiles: &[String]) -> HashMap<String, String> {
        self.properties.active(profiles)
    }

    fn active_repositories(&self, profiles: &[String]) -> Vec<RawRepository> {
        self.repositories.active(profiles)
    }

    fn active_dependency_management(&self, profiles: &[String]) -> Vec<RawDependency> {
        self.dependency_management.active(profiles)
    }

    fn active_dependencies(&self, profiles: &[String]) -> Vec<RawDependency> {
        self.dependencies.active(profiles)
    }

    fn is_snapshot(&self) -> bool {
        self.coordinates
            .version
            .as_deref()
            .map(|v| v.ends_with("-SNAPSHOT"))
            .unwrap_or(false)
    }

    fn property_placeholder_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut scan = |text: &Option<String>| {
            if let Some(text) = text {
                collect_placeholder_names(text, &mut names);
            }
        };
        scan(&self.coordinates.group_id);
        scan(&self.coordinates.artifact_id);
        scan(&self.coordinates.version);
        for dep in self
            .dependencies
            .unconditional
            .iter()
            .chain(self.dependency_management.unconditional.iter())
        {
            scan(&dep.version);
        }
        names.sort();
        names.dedup();
        names
    }

    fn licenses(&self) -> Vec<License> {
        self.licenses.clone()
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn packaging(&self) -> Option<String> {
        self.packaging.clone()
    }
}

fn collect_placeholder_names(text: &str, out: &mut Vec<String>) {
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                out.push(after[..end].to_owned());
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
}

/// Parses a POM document into an `XmlRawPom`. Returns `None` for malformed
/// XML or a document with no `<project>` root; the caller reports this
/// through its own error sink.
pub fn parse_pom_xml(input: &str) -> Option<XmlRawPom> {
    let doc = roxmltree::Document::parse(input).ok()?;
    let root = doc.root();
    let project_node = node(&root, "project")?;

    let mut properties_by_profile = HashMap::new();
    let mut repositories_by_profile = HashMap::new();
    let mut dependency_management_by_profile = HashMap::new();
    let mut dependencies_by_profile = HashMap::new();

    if let Some(profiles_node) = node(&project_node, "profiles") {
        for profile_node in children(&profiles_node, "profile") {
            let Some(id) = node_text(&profile_node, "id") else {
                continue;
            };
            properties_by_profile.insert(id.clone(), parse_properties(&profile_node));
            repositories_by_profile.insert(id.clone(), parse_repositories(&profile_node));
            dependency_management_by_profile.insert(id.clone(), parse_dependency_management(&profile_node));
            dependencies_by_profile.insert(id, parse_dependencies(&profile_node));
        }
    }

    Some(XmlRawPom {
        coordinates: parse_coordinates(&project_node),
        parent: parse_parent(&project_node),
        properties: ProfileScoped {
            unconditional: parse_properties(&project_node),
            by_profile: properties_by_profile,
        },
        repositories: ProfileScoped {
            unconditional: parse_repositories(&project_node),
            by_profile: repositories_by_profile,
        },
        dependency_management: ProfileScoped {
            unconditional: parse_dependency_management(&project_node),
            by_profile: dependency_management_by_profile,
        },
        dependencies: ProfileScoped {
            unconditional: parse_dependencies(&project_node),
            by_profile: dependencies_by_profile,
        },
        licenses: parse_licenses(&project_node),
        name: node_text(&project_node, "name"),
        description: node_text(&project_node, "description"),
        packaging: node_text(&project_node, "packaging"),
    })
}

/// A `ureq`-based `Downloader`. Tries each repository in order, building
/// the usual Maven layout path (`groupId/artifactId/version/artifactId-
/// version.pom`), and stops at the first one that returns a 2xx response.
pub struct DefaultDownloader;

impl Downloader for DefaultDownloader {
    fn download(
        &self,
        coordinate: &Coordinate,
        _relative_path: Option<&str>,
        _containing_pom: Option<&Coordinate>,
        repositories: &[EffectiveRepository],
        _ctx: &ExecutionContext,
    ) -> Result<Option<Rc<dyn RawPom>>, String> {
        for repo in repositories {
            let path = format!(
                "{}/{}/{}/{}/{}-{}.pom",
                repo.url.trim_end_matches('/'),
                coordinate.group_id.replace('.', "/"),
                coordinate.artifact_id,
                coordinate.version,
                coordinate.artifact_id,
                coordinate.version,
            );

            log::debug!("fetching {}...", path);

            let mut request = ureq::get(&path);
            if let Some(creds) = &repo.credentials {
                use base64::Engine;
                let token = base64::prelude::BASE64_STANDARD.encode(format!("{}:{}", creds.username, creds.password));
                request = request.set("Authorization", &format!("Basic {token}"));
            }

            match request.call() {
                Ok(response) => {
                    let text = response
                        .into_string()
                        .map_err(|e| format!("failed to read response body from {path}: {e}"))?;
                    match parse_pom_xml(&text) {
                        Some(pom) => return Ok(Some(Rc::new(pom) as Rc<dyn RawPom>)),
                        None => return Err(format!("invalid POM XML from {path}")),
                    }
                }
                Err(ureq::Error::Status(404, _)) => continue,
                Err(e) => return Err(format!("request to {path} failed: {e}")),
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinates_parent_and_dependencies() {
        let xml = r#"
            <project>
                <parent>
                    <groupId>com.example</groupId>
                    <artifactId>parent-pom</artifactId>
                    <version>1.0.0</version>
                </parent>
                <artifactId>child</artifactId>
                <properties>
                    <foo>bar</foo>
                </properties>
                <dependencies>
                    <dependency>
                        <groupId>com.example</groupId>
                        <artifactId>lib</artifactId>
                        <version>${foo}</version>
                        <scope>compile</scope>
                    </dependency>
                </dependencies>
            </project>
        "#;
        let pom = parse_pom_xml(xml).unwrap();
        assert_eq!(pom.coordinates().artifact_id.as_deref(), Some("child"));
        assert_eq!(pom.parent().unwrap().group_id, "com.example");
        assert_eq!(pom.active_properties(&[]).get("foo").map(String::as_str), Some("bar"));
        let deps = pom.active_dependencies(&[]);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].version.as_deref(), Some("${foo}"));
    }

    #[test]
    fn profile_properties_only_apply_when_active() {
        let xml = r#"
            <project>
                <artifactId>a</artifactId>
                <profiles>
                    <profile>
                        <id>extra</id>
                        <properties>
                            <only-in-profile>yes</only-in-profile>
                        </properties>
                    </profile>
                </profiles>
            </project>
        "#;
        let pom = parse_pom_xml(xml).unwrap();
        assert!(pom.active_properties(&[]).get("only-in-profile").is_none());
        assert_eq!(
            pom.active_properties(&["extra".to_owned()])
                .get("only-in-profile")
                .map(String::as_str),
            Some("yes")
        );
    }

    #[test]
    fn detects_snapshot_versions() {
        let xml = r#"<project><artifactId>a</artifactId><version>1.0-SNAPSHOT</version></project>"#;
        let pom = parse_pom_xml(xml).unwrap();
        assert!(pom.is_snapshot());
    }

    #[test]
    fn rejects_documents_without_a_project_root() {
        assert!(parse_pom_xml("<not-a-pom/>").is_none());
    }
}
