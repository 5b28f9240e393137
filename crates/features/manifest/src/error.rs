use std::borrow::Cow;

/// Errors raised while loading a manifest. All of them are fatal and occur
/// before any candidate is probed.
#[hdac_derive::hdac_error]
pub enum ManifestError {
    #[error("Failed to read manifest{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Malformed manifest{}: {source}", format_context(.context))]
    Parse { source: toml::de::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid candidate{}: {source}", format_context(.context))]
    InvalidLocator { source: hdac_domain::LocatorError, context: Option<Cow<'static, str>> },

    #[error("Invalid layout template{}: `{template}`", format_context(.context))]
    InvalidTemplate { template: String, context: Option<Cow<'static, str>> },

    #[error("Invalid name{}: `{name}`", format_context(.context))]
    InvalidName { name: String, context: Option<Cow<'static, str>> },

    #[error("Dependency declared twice{}: `{name}`", format_context(.context))]
    DuplicateDependency { name: String, context: Option<Cow<'static, str>> },

    #[error("Dependency has no candidates{}: `{name}`", format_context(.context))]
    EmptyCandidates { name: String, context: Option<Cow<'static, str>> },

    #[error("Candidate listed twice for `{name}`{}: {candidate}", format_context(.context))]
    DuplicateCandidate { name: String, candidate: String, context: Option<Cow<'static, str>> },

    #[error("Fallback declared twice{}: `{name}`", format_context(.context))]
    DuplicateFallback { name: String, context: Option<Cow<'static, str>> },

    #[error("Conflicting fallback `{name}`{}: {message}", format_context(.context))]
    ConflictingFallback {
        name: String,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },
}
