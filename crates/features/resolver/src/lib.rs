//! # Dependency Resolver
//!
//! Walks each dependency's candidates in declared order, asks a [`Probe`] whether the
//! candidate exists, and commits to the first hit. A mandatory dependency with no hit
//! is a [`ResolutionError::Unresolved`]; an optional one simply resolves to nothing.
//!
//! Resolutions never share state, so the outcome of one dependency cannot change
//! another's.

pub mod diagnostics;
mod error;
mod probe;
mod resolver;

pub use diagnostics::Diagnostic;
pub use error::{ResolutionError, ResolutionErrorExt};
pub use probe::Probe;
pub use resolver::Resolver;
