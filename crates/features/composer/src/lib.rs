//! # Namespace Composer
//!
//! Merges base sources and resolved dependencies into one ordered, duplicate-free
//! [`CompositeNamespace`](hdac_domain::CompositeNamespace), then lets the
//! [`FallbackLayer`] fill symbol gaps with guarded defaults. [`render`] turns the
//! result into the header the driver build includes.

mod compose;
mod error;
mod fallback;
mod index;
mod render;

pub use compose::compose;
pub use error::{ComposeError, ComposeErrorExt};
pub use fallback::FallbackLayer;
pub use index::SymbolIndex;
pub use render::render;
