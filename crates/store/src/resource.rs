//! Resource-name parsing helpers
//!
//! Secret Manager resource names follow a fixed shape:
//!
//! - parent: `projects/<project>`
//! - secret: `projects/<project>/secrets/<secret>`
//! - version: `projects/<project>/secrets/<secret>/versions/<version>`

/// Components of a full version resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRef<'a> {
    /// Project identifier
    pub project: &'a str,
    /// Short secret name
    pub secret: &'a str,
    /// Version label
    pub version: &'a str,
}

/// Extract the project identifier from a parent name (`projects/<project>`).
#[must_use]
pub fn parse_parent(parent: &str) -> Option<&str> {
    match parent.strip_prefix("projects/") {
        Some(project) if !project.is_empty() && !project.contains('/') => Some(project),
        _ => None,
    }
}

/// Parse a full version resource name
/// (`projects/<project>/secrets/<secret>/versions/<version>`).
#[must_use]
pub fn parse_version_name(name: &str) -> Option<VersionRef<'_>> {
    let parts: Vec<&str> = name.split('/').collect();
    match parts.as_slice() {
        &["projects", project, "secrets", secret, "versions", version]
            if !project.is_empty() && !secret.is_empty() && !version.is_empty() =>
        {
            Some(VersionRef {
                project,
                secret,
                version,
            })
        }
        _ => None,
    }
}
