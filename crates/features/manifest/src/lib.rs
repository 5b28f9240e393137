//! # Manifest
//!
//! Loads the declarative description of a compatibility layer: which sources are
//! always included, which logical dependencies must be located (and where to look),
//! and which fallback symbols to supply when nothing else defines them.
//!
//! Everything here is validated up front. A manifest that loads is safe to hand to
//! the resolver; every [`ManifestError`] is raised before any probe runs.

mod error;
mod manifest;
pub mod policy;

pub use error::{ManifestError, ManifestErrorExt};
pub use manifest::Manifest;
pub use policy::{CandidatePolicy, LayoutPolicy, NAME_PLACEHOLDER};
