//! Helper output protocol
//!
//! The helper prints exactly one JSON document:
//!
//! ```json
//! {"kind": "success", "projects": [{"id": "...", "name": "...", "path": "...", "abspath": "..."}]}
//! {"kind": "success", "projects": {"idea": [...], "webstorm": [...]}}
//! {"kind": "error", "message": "...", "traceback": "..."}
//! ```
//!
//! Decoding is strict: unknown kinds, missing or extra fields and wrong types
//! are all rejected, and nothing is salvaged from a rejected document.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use super::types::{Project, ProjectCatalog, ProjectTable};

/// Decoded helper output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperResult {
    Success {
        projects: ProjectListing,
    },
    Error {
        message: String,
        traceback: Option<String>,
    },
}

/// Project entries as listed by the helper
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProjectListing {
    /// Single-product helpers print a flat list
    Single(Vec<Project>),
    /// Multi-product helpers key their lists by product
    ByProduct(BTreeMap<String, Vec<Project>>),
}

impl ProjectListing {
    /// Build the lookup tables, deduplicating ids per table
    pub fn into_catalog(self) -> ProjectCatalog {
        match self {
            ProjectListing::Single(projects) => {
                ProjectCatalog::Single(projects.into_iter().collect())
            }
            ProjectListing::ByProduct(products) => ProjectCatalog::Products(
                products
                    .into_iter()
                    .map(|(product, projects)| {
                        (product, projects.into_iter().collect::<ProjectTable>())
                    })
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Kind {
    Success,
    Error,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    kind: Kind,
    #[serde(default, deserialize_with = "present")]
    projects: Option<ProjectListing>,
    #[serde(default, deserialize_with = "present")]
    message: Option<String>,
    #[serde(default, deserialize_with = "present")]
    traceback: Option<String>,
}

/// Optional field that may be absent but never `null`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Reason a helper document was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ProtocolError {
    pub reason: String,
}

impl ProtocolError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Decode the helper's standard output
pub fn decode(output: &str) -> Result<HelperResult, ProtocolError> {
    let envelope: Envelope =
        serde_json::from_str(output).map_err(|e| ProtocolError::new(e.to_string()))?;

    match envelope {
        Envelope {
            kind: Kind::Success,
            projects: Some(projects),
            message: None,
            traceback: None,
        } => Ok(HelperResult::Success { projects }),
        Envelope {
            kind: Kind::Success,
            projects: None,
            ..
        } => Err(ProtocolError::new("success result without projects")),
        Envelope {
            kind: Kind::Success,
            ..
        } => Err(ProtocolError::new("success result with error fields")),
        Envelope {
            kind: Kind::Error,
            projects: None,
            message: Some(message),
            traceback,
        } => Ok(HelperResult::Error { message, traceback }),
        Envelope {
            kind: Kind::Error,
            message: None,
            ..
        } => Err(ProtocolError::new("error result without message")),
        Envelope {
            kind: Kind::Error,
            ..
        } => Err(ProtocolError::new("error result with projects")),
    }
}
