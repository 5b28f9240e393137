//! Diagnostics Reporter.
//!
//! Turns a resolution failure into the operator-facing message: which dependency is
//! missing and every location that was tried, in the order it was tried.

use crate::error::ResolutionError;
use hdac_domain::CandidateRef;
use serde::Serialize;
use std::fmt;
use tracing::error;

/// A fatal, human-readable resolution report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub dependency: String,
    pub attempted: Vec<CandidateRef>,
}

impl Diagnostic {
    /// Builds the report for a failure and emits it at `error` level.
    #[must_use]
    pub fn report(failure: &ResolutionError) -> Self {
        let diagnostic = Self::from(failure);
        error!(
            dependency = %diagnostic.dependency,
            attempted = diagnostic.attempted.len(),
            "Unresolved mandatory dependency"
        );
        diagnostic
    }
}

impl From<&ResolutionError> for Diagnostic {
    fn from(failure: &ResolutionError) -> Self {
        Self { dependency: failure.dependency().to_owned(), attempted: failure.attempted().to_vec() }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: cannot locate mandatory dependency `{}`", self.dependency)?;
        write!(f, "  tried, in order:")?;
        for (i, candidate) in self.attempted.iter().enumerate() {
            write!(f, "\n    {}. {candidate}  ({})", i + 1, candidate.include_spelling())?;
        }
        if self.attempted.is_empty() {
            write!(f, "\n    (no candidates)")?;
        }
        Ok(())
    }
}
