//! Reference Resolution
//!
//! Maps short or absolute Compute resource identifiers to canonical references
//! and the context (project, region) they imply.
//!
//! The translator only talks to [`ReferenceResolver`]. [`SelfLinkResolver`] is
//! the default implementation: it parses names, partial paths and self-links
//! against a default project and region without touching the network.

use std::fmt;
use thiserror::Error;
use url::Url;

/// Base of every v1 Compute self-link
pub const COMPUTE_V1_BASE: &str = "https://www.googleapis.com/compute/v1/";

/// Kind of resource a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Network,
    Subnetwork,
}

impl ReferenceKind {
    /// Collection segment used in resource paths
    pub fn collection(self) -> &'static str {
        match self {
            ReferenceKind::Network => "networks",
            ReferenceKind::Subnetwork => "subnetworks",
        }
    }

    fn is_regional(self) -> bool {
        matches!(self, ReferenceKind::Subnetwork)
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Network => write!(f, "network"),
            ReferenceKind::Subnetwork => write!(f, "subnetwork"),
        }
    }
}

/// Errors reported by a resolver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no project given for {0:?} and no default project configured")]
    MissingProject(String),

    #[error("no region given for {0:?} and no default region configured")]
    MissingRegion(String),

    #[error("malformed reference {value:?}: {reason}")]
    Malformed { value: String, reason: String },

    #[error("{value:?} is not a {expected} reference")]
    KindMismatch {
        value: String,
        expected: ReferenceKind,
    },
}

/// Canonical form of a cross-referenced resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalReference {
    pub kind: ReferenceKind,
    pub project: String,
    /// Owning region, for regional resources
    pub region: Option<String>,
    /// Resource name; empty when the caller gave no identifier
    pub name: String,
}

impl CanonicalReference {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// `projects/P/global/networks/N` or `projects/P/regions/R/subnetworks/S`
    pub fn relative_link(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        match (&self.region, self.kind.is_regional()) {
            (Some(region), true) => format!(
                "projects/{}/regions/{}/{}/{}",
                self.project,
                region,
                self.kind.collection(),
                self.name
            ),
            _ => format!(
                "projects/{}/global/{}/{}",
                self.project,
                self.kind.collection(),
                self.name
            ),
        }
    }

    /// Absolute v1 self-link
    pub fn self_link(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("{}{}", COMPUTE_V1_BASE, self.relative_link())
    }
}

/// Where in the declarative value a reference came from
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Field path, e.g. `network_interface.0.subnetwork`
    pub path: &'a str,
    /// Project override from a companion field (e.g. `subnetwork_project`)
    pub project: Option<&'a str>,
}

impl<'a> FieldContext<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            project: None,
        }
    }

    pub fn with_project(mut self, project: Option<&'a str>) -> Self {
        self.project = project.filter(|p| !p.is_empty());
        self
    }
}

/// Turns raw identifiers into canonical references.
///
/// Implementations must accept short names and already-absolute identifiers,
/// and resolving the same identifier twice must give the same reference.
pub trait ReferenceResolver {
    fn resolve(
        &self,
        kind: ReferenceKind,
        raw: &str,
        field: &FieldContext<'_>,
    ) -> Result<CanonicalReference, ResolveError>;
}

/// Offline resolver that parses identifiers against default project/region
#[derive(Debug, Clone, Default)]
pub struct SelfLinkResolver {
    pub project: Option<String>,
    pub region: Option<String>,
}

impl SelfLinkResolver {
    pub fn new(project: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            project: Some(project.into()).filter(|p: &String| !p.is_empty()),
            region: Some(region.into()).filter(|r: &String| !r.is_empty()),
        }
    }

    fn default_project(&self, raw: &str, field: &FieldContext<'_>) -> Result<String, ResolveError> {
        field
            .project
            .map(str::to_string)
            .or_else(|| self.project.clone())
            .ok_or_else(|| ResolveError::MissingProject(raw.to_string()))
    }

    fn default_region(&self, raw: &str) -> Result<String, ResolveError> {
        self.region
            .clone()
            .ok_or_else(|| ResolveError::MissingRegion(raw.to_string()))
    }
}

impl ReferenceResolver for SelfLinkResolver {
    fn resolve(
        &self,
        kind: ReferenceKind,
        raw: &str,
        field: &FieldContext<'_>,
    ) -> Result<CanonicalReference, ResolveError> {
        let raw = raw.trim();
        tracing::trace!("resolve {} {:?} at {}", kind, raw, field.path);

        if raw.is_empty() {
            // Nothing to point at; carry whatever context the defaults give.
            return Ok(CanonicalReference {
                kind,
                project: field
                    .project
                    .map(str::to_string)
                    .or_else(|| self.project.clone())
                    .unwrap_or_default(),
                region: if kind.is_regional() {
                    self.region.clone()
                } else {
                    None
                },
                name: String::new(),
            });
        }

        let segments = path_segments(raw)?;
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let collection = kind.collection();

        let (project, region, name) = match segments.as_slice() {
            [name] => {
                let region = if kind.is_regional() {
                    Some(self.default_region(raw)?)
                } else {
                    None
                };
                (self.default_project(raw, field)?, region, *name)
            }
            ["global", c, name] if !kind.is_regional() && *c == collection => {
                (self.default_project(raw, field)?, None, *name)
            }
            ["regions", region, c, name] if kind.is_regional() && *c == collection => (
                self.default_project(raw, field)?,
                Some(region.to_string()),
                *name,
            ),
            ["projects", project, "global", c, name] if !kind.is_regional() && *c == collection => {
                (project.to_string(), None, *name)
            }
            ["projects", project, "regions", region, c, name]
                if kind.is_regional() && *c == collection =>
            {
                (project.to_string(), Some(region.to_string()), *name)
            }
            [.., c, _] if *c == "networks" || *c == "subnetworks" => {
                return Err(ResolveError::KindMismatch {
                    value: raw.to_string(),
                    expected: kind,
                })
            }
            _ => {
                return Err(ResolveError::Malformed {
                    value: raw.to_string(),
                    reason: format!("unrecognized {} path", kind),
                })
            }
        };

        if name.is_empty() {
            return Err(ResolveError::Malformed {
                value: raw.to_string(),
                reason: "empty resource name".to_string(),
            });
        }

        Ok(CanonicalReference {
            kind,
            project,
            region,
            name: name.to_string(),
        })
    }
}

/// Split an identifier into path segments, dropping any URL prefix before `projects/`
fn path_segments(raw: &str) -> Result<Vec<String>, ResolveError> {
    if raw.starts_with("https://") || raw.starts_with("http://") {
        let url = Url::parse(raw).map_err(|e| ResolveError::Malformed {
            value: raw.to_string(),
            reason: e.to_string(),
        })?;
        let segments: Vec<String> = url
            .path_segments()
            .map(|s| s.map(str::to_string).collect())
            .unwrap_or_default();
        let Some(start) = segments.iter().position(|s| s == "projects") else {
            return Err(ResolveError::Malformed {
                value: raw.to_string(),
                reason: "self-link has no projects/ segment".to_string(),
            });
        };
        return Ok(segments[start..].to_vec());
    }

    Ok(raw
        .trim_matches('/')
        .split('/')
        .map(str::to_string)
        .collect())
}

/// Rewrite a beta (or other version) Compute self-link to its v1 form
pub fn convert_self_link_to_v1(link: &str) -> String {
    const MARKER: &str = "/compute/";
    let Some(start) = link.find(MARKER) else {
        return link.to_string();
    };
    let rest = &link[start + MARKER.len()..];
    match rest.find('/') {
        Some(end) => format!("{}{}v1{}", &link[..start], MARKER, &rest[end..]),
        None => link.to_string(),
    }
}
