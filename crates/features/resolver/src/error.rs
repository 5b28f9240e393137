use hdac_domain::CandidateRef;
use std::borrow::Cow;

#[hdac_derive::hdac_error]
pub enum ResolutionError {
    #[error(
        "Mandatory dependency `{name}` not found{}: {} candidate(s) tried",
        format_context(.context),
        .attempted.len()
    )]
    Unresolved { name: String, attempted: Vec<CandidateRef>, context: Option<Cow<'static, str>> },
}

impl ResolutionError {
    /// The dependency that could not be located.
    #[must_use]
    pub fn dependency(&self) -> &str {
        match self {
            Self::Unresolved { name, .. } => name,
        }
    }

    /// Every candidate that was probed, in the order it was probed.
    #[must_use]
    pub fn attempted(&self) -> &[CandidateRef] {
        match self {
            Self::Unresolved { attempted, .. } => attempted,
        }
    }
}
