//! Candidate Ordering Policy.
//!
//! Encodes where each distribution layout keeps a header. A [`LayoutPolicy`] holds
//! an ordered list of templates such as `sys:sound/pci/hda/{name}.h`; expanding them
//! for a dependency name yields its candidate list. Dependencies may instead carry an
//! explicit list, which replaces the templates entirely.
//!
//! Order is the only tie-break: the resolver commits to the first candidate that
//! exists, even if a later one would also match.

use crate::error::ManifestError;
use fxhash::FxHashMap;
use hdac_domain::{CandidateRef, LocatorError};

pub const NAME_PLACEHOLDER: &str = "{name}";

/// Supplies the ordered candidates for a logical dependency.
///
/// Implementations must be deterministic: the same name always yields the same list.
pub trait CandidatePolicy {
    /// # Errors
    /// Returns [`ManifestError::InvalidLocator`] if a candidate cannot be built for
    /// `name`; a list with a gap would silently shift the priority order.
    fn candidates_for(&self, name: &str) -> Result<Vec<CandidateRef>, ManifestError>;
}

#[derive(Debug, Clone, Default)]
pub struct LayoutPolicy {
    templates: Vec<String>,
    overrides: FxHashMap<String, Vec<CandidateRef>>,
}

impl LayoutPolicy {
    /// Builds a policy from layout templates, in priority order.
    ///
    /// # Errors
    /// Returns [`ManifestError::InvalidTemplate`] if a template lacks the `{name}`
    /// placeholder, or [`ManifestError::InvalidLocator`] if it does not expand to a
    /// valid candidate.
    pub fn new(templates: Vec<String>) -> Result<Self, ManifestError> {
        for template in &templates {
            if !template.contains(NAME_PLACEHOLDER) {
                return Err(ManifestError::InvalidTemplate {
                    template: template.clone(),
                    context: Some("missing `{name}` placeholder".into()),
                });
            }
            expand(template, "probe").map_err(|source| ManifestError::InvalidLocator {
                source,
                context: Some(format!("layout template `{template}`").into()),
            })?;
        }
        Ok(Self { templates, overrides: FxHashMap::default() })
    }

    /// Pins an explicit candidate list for one dependency.
    #[must_use]
    pub fn with_override(mut self, name: impl Into<String>, candidates: Vec<CandidateRef>) -> Self {
        self.overrides.insert(name.into(), candidates);
        self
    }

    #[must_use]
    pub fn templates(&self) -> &[String] {
        &self.templates
    }
}

impl CandidatePolicy for LayoutPolicy {
    fn candidates_for(&self, name: &str) -> Result<Vec<CandidateRef>, ManifestError> {
        if let Some(explicit) = self.overrides.get(name) {
            return Ok(explicit.clone());
        }
        self.templates
            .iter()
            .map(|template| {
                expand(template, name).map_err(|source| ManifestError::InvalidLocator {
                    source,
                    context: Some(format!("layout template `{template}` for `{name}`").into()),
                })
            })
            .collect()
    }
}

fn expand(template: &str, name: &str) -> Result<CandidateRef, LocatorError> {
    template.replace(NAME_PLACEHOLDER, name).parse()
}
