//! # Domain Models
//!
//! Pure data types shared by every stage of the pipeline, with minimal dependencies
//! (`serde`, plus `thiserror` for the locator error).
//! Keep it lean: no I/O and no probing, only data and simple helpers.

pub mod candidate;
pub mod config;
pub mod dependency;
pub mod fallback;
pub mod namespace;

pub use candidate::{CandidateKind, CandidateRef, LocatorError};
pub use dependency::{LogicalDependency, ResolutionResult};
pub use fallback::{FallbackDefinition, FallbackSymbol, Guard, SymbolKind};
pub use namespace::{ComposedSource, CompositeNamespace, Directive, SourceId, SourceOrigin};
