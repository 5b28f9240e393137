use std::borrow::Cow;
use std::path::PathBuf;

#[hdac_derive::hdac_error]
pub enum ProbeError {
    #[error("Probe I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Local root is not a directory{}: {}", format_context(.context), .path.display())]
    InvalidRoot { path: PathBuf, context: Option<Cow<'static, str>> },
}
