//! Facade crate for the header resolution pipeline.
//! Re-exports every stage and wires them together in [`Pipeline`].
//! Keep this crate thin: it should compose other crates, not implement pipeline logic.
//!
//! ## Usage
//! ```rust
//! use hdac::Pipeline;
//! use hdac::manifest::Manifest;
//! use hdac::probe::StaticEnvironment;
//!
//! let manifest: Manifest = r#"
//!     [[dependency]]
//!     name = "hda_local"
//!     mandatory = true
//!     candidates = ["sys:sound/pci/hda/hda_local.h", "sys:sound/hda_local.h"]
//!
//!     [[fallback]]
//!     name = "HDA_FIXUP_ACT_INIT"
//!     kind = "constant"
//!     value = "2"
//! "#
//! .parse()?;
//!
//! let env = StaticEnvironment::new().with_header("sys:sound/hda_local.h".parse()?, ["hda_fixup"]);
//! let composition = Pipeline::new(&manifest).environment(env).run()?;
//!
//! assert!(composition.header.contains("#include <sound/hda_local.h>"));
//! assert!(composition.header.contains("#define HDA_FIXUP_ACT_INIT 2"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod inputs;
mod pipeline;

pub use error::{PipelineError, PipelineErrorExt};
pub use inputs::{fs_environment, load_manifest, load_settings};
pub use pipeline::{Composition, NoEnv, Pipeline, WithEnv};

pub use hdac_composer as composer;
pub use hdac_domain as domain;
pub use hdac_kernel as kernel;
pub use hdac_manifest as manifest;
pub use hdac_probe as probe;
pub use hdac_resolver as resolver;
