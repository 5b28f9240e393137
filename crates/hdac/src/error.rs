use hdac_composer::ComposeError;
use hdac_kernel::config::ConfigError;
use hdac_kernel::output::OutputError;
use hdac_manifest::ManifestError;
use hdac_probe::ProbeError;
use hdac_resolver::ResolutionError;
use std::borrow::Cow;

/// Any failure that stops a run. No partial output exists when one is returned.
#[hdac_derive::hdac_error]
pub enum PipelineError {
    #[error("{source}{}", format_context(.context))]
    Manifest { source: ManifestError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Resolution { source: ResolutionError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Compose { source: ComposeError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Probe { source: ProbeError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Output { source: OutputError, context: Option<Cow<'static, str>> },
}
