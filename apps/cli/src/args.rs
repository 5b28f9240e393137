//! # CLI Argument Definitions

use clap::{Args, Parser, Subcommand};
use hdac::domain::config::ProbeConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hdac")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Resolve HDA kernel headers and synthesize a compatibility header")]
pub struct Cli {
    /// Settings file (defaults to `hdac.toml` in the working directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load and validate a manifest without probing anything
    Check {
        #[command(flatten)]
        manifest: ManifestArg,
    },
    /// Print which candidate each dependency resolves to
    Resolve {
        #[command(flatten)]
        manifest: ManifestArg,
        #[command(flatten)]
        probe: ProbeArgs,
        /// Print the resolution table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the full pipeline and write the compatibility header
    Compose {
        #[command(flatten)]
        manifest: ManifestArg,
        #[command(flatten)]
        probe: ProbeArgs,
        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct ManifestArg {
    /// Manifest file (the bundled CS8409 manifest when omitted)
    #[arg(short = 'm', long = "manifest", value_name = "FILE")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Kernel build tree; searches `<DIR>/include`, then `<DIR>`
    #[arg(long, value_name = "DIR")]
    pub kernel_dir: Option<PathBuf>,

    /// Extra system include directory, searched after the kernel tree
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Root for `local:` candidates, usually the driver source directory
    #[arg(long, value_name = "DIR")]
    pub local_root: Option<PathBuf>,
}

impl ProbeArgs {
    /// Layers command-line flags over the loaded settings.
    pub fn apply(self, config: &mut ProbeConfig) {
        if let Some(dir) = self.kernel_dir {
            config.kernel_dir = Some(dir);
        }
        config.include_dirs.extend(self.include_dirs);
        if let Some(root) = self.local_root {
            config.local_root = root;
        }
    }
}
