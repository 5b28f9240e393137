//! Kernel utilities shared by the pipeline and the CLI.
//! Keep this crate lightweight: configuration loading and artifact output only.
//!
//! ## Config loading
//! ```rust,no_run
//! use hdac_kernel::config::load_config;
//! use hdac_kernel::domain::config::HdacConfig;
//!
//! let cfg: HdacConfig = load_config(Some("hdac")).unwrap_or_default();
//! ```
pub mod config;
pub mod output;

pub use hdac_domain as domain;
