//! Probe environments for the resolver and composer.
//!
//! - **[`FsEnvironment`]**: the real build environment. System candidates are looked up
//!   along the include search path (kernel `include/`, kernel tree, extra directories),
//!   local candidates under the driver's source root. Identity is the canonical path,
//!   and headers are scanned for the symbols they define.
//! - **[`StaticEnvironment`]**: an in-memory table of headers and their symbols, for
//!   dry runs and tests.
//!
//! Neither environment ever fails a probe: anything the filesystem refuses to answer is
//! treated as absent.
//!
//! # Examples
//!
//! ```rust
//! use hdac_probe::FsEnvironment;
//! use hdac_resolver::Probe;
//!
//! # let tmp = tempfile::tempdir().unwrap();
//! std::fs::write(tmp.path().join("hda_local.h"), "#define HDA_FIXUP_ACT_INIT 2\n").unwrap();
//! let env = FsEnvironment::new(tmp.path());
//!
//! assert!(env.probe(&"local:hda_local.h".parse().unwrap()));
//! assert!(!env.probe(&"sys:sound/hda_local.h".parse().unwrap()));
//! ```

mod error;
mod fs;
mod memory;
pub mod scan;

pub use error::{ProbeError, ProbeErrorExt};
pub use fs::FsEnvironment;
pub use memory::StaticEnvironment;
