//! Physical locations that may supply a logical dependency.
//!
//! A candidate is written as `sys:<path>` (resolved against the system include
//! search path, rendered as `#include <path>`) or `local:<path>` (resolved against
//! the driver source tree, rendered as `#include "path"`).

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

const SYSTEM_PREFIX: &str = "sys:";
const LOCAL_PREFIX: &str = "local:";

/// Errors produced while parsing a candidate locator.
#[hdac_derive::hdac_error]
pub enum LocatorError {
    #[error("Unknown locator scheme{}: {locator}", format_context(.context))]
    UnknownScheme { locator: String, context: Option<Cow<'static, str>> },

    #[error("Empty locator path{}: {locator}", format_context(.context))]
    EmptyPath { locator: String, context: Option<Cow<'static, str>> },

    #[error("Locator escapes its search root{}: {locator}", format_context(.context))]
    EscapesRoot { locator: String, context: Option<Cow<'static, str>> },

    #[error("Local locator must be relative{}: {locator}", format_context(.context))]
    AbsoluteLocal { locator: String, context: Option<Cow<'static, str>> },

    #[error("Locator cannot be spelled in an #include{}: {locator:?}", format_context(.context))]
    InvalidCharacter { locator: String, context: Option<Cow<'static, str>> },
}

/// Where a candidate is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// Searched in the system/kernel include directories (`<...>`).
    SystemAbsolute,
    /// Searched relative to the driver's own source tree (`"..."`).
    LocalRelative,
}

impl CandidateKind {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::SystemAbsolute => SYSTEM_PREFIX,
            Self::LocalRelative => LOCAL_PREFIX,
        }
    }
}

/// A single physical location to test.
///
/// The locator is stored in normalized form: `/`-separated, no `.` segments,
/// `..` collapsed, and no leading slash. Two candidates with the same kind and
/// normalized locator are the same candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CandidateRef {
    kind: CandidateKind,
    locator: String,
}

impl CandidateRef {
    /// Builds a system candidate, normalizing the path.
    ///
    /// # Errors
    /// Returns [`LocatorError`] if the path is empty or climbs above its root.
    pub fn system(path: &str) -> Result<Self, LocatorError> {
        Ok(Self { kind: CandidateKind::SystemAbsolute, locator: normalize(path)? })
    }

    /// Builds a local candidate, normalizing the path.
    ///
    /// # Errors
    /// Returns [`LocatorError`] if the path is absolute, empty, or climbs above its root.
    pub fn local(path: &str) -> Result<Self, LocatorError> {
        if path.starts_with('/') {
            return Err(LocatorError::AbsoluteLocal { locator: path.to_owned(), context: None });
        }
        Ok(Self { kind: CandidateKind::LocalRelative, locator: normalize(path)? })
    }

    #[must_use]
    pub const fn kind(&self) -> CandidateKind {
        self.kind
    }

    /// The normalized path, without scheme.
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// The C preprocessor spelling used in an `#include` directive.
    #[must_use]
    pub fn include_spelling(&self) -> String {
        match self.kind {
            CandidateKind::SystemAbsolute => format!("<{}>", self.locator),
            CandidateKind::LocalRelative => format!("\"{}\"", self.locator),
        }
    }
}

/// Lexically collapses `.` and `..`, refusing to climb above the root.
fn normalize(path: &str) -> Result<String, LocatorError> {
    // Quotes, angle brackets and line breaks would end the directive early.
    if path.chars().any(|c| matches!(c, '<' | '>' | '"') || c.is_control()) {
        return Err(LocatorError::InvalidCharacter { locator: path.to_owned(), context: None });
    }

    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if segments.pop().is_none() {
                    return Err(LocatorError::EscapesRoot {
                        locator: path.to_owned(),
                        context: None,
                    });
                }
            },
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(LocatorError::EmptyPath { locator: path.to_owned(), context: None });
    }

    Ok(segments.join("/"))
}

impl FromStr for CandidateRef {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix(SYSTEM_PREFIX) {
            Self::system(path)
        } else if let Some(path) = s.strip_prefix(LOCAL_PREFIX) {
            Self::local(path)
        } else {
            Err(LocatorError::UnknownScheme {
                locator: s.to_owned(),
                context: Some("expected `sys:` or `local:`".into()),
            })
        }
    }
}

impl TryFrom<String> for CandidateRef {
    type Error = LocatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CandidateRef> for String {
    fn from(value: CandidateRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CandidateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_schemes() {
        let sys: CandidateRef = "sys:sound/pci/hda/hda_local.h".parse().unwrap();
        assert_eq!(sys.kind(), CandidateKind::SystemAbsolute);
        assert_eq!(sys.locator(), "sound/pci/hda/hda_local.h");

        let local: CandidateRef = "local:hda_local.h".parse().unwrap();
        assert_eq!(local.kind(), CandidateKind::LocalRelative);
        assert_eq!(local.include_spelling(), "\"hda_local.h\"");
    }

    #[test]
    fn system_paths_drop_leading_slash() {
        let a: CandidateRef = "sys:/sound/hda_local.h".parse().unwrap();
        let b: CandidateRef = "sys:sound/./hda_local.h".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "sys:sound/hda_local.h");
        assert_eq!(a.include_spelling(), "<sound/hda_local.h>");
    }

    #[test]
    fn dot_dot_collapses_inside_root() {
        let c: CandidateRef = "local:include/../hda_jack.h".parse().unwrap();
        assert_eq!(c.locator(), "hda_jack.h");
    }

    #[test]
    fn rejects_bad_locators() {
        assert!(matches!(
            "hda_local.h".parse::<CandidateRef>(),
            Err(LocatorError::UnknownScheme { .. })
        ));
        assert!(matches!("sys:".parse::<CandidateRef>(), Err(LocatorError::EmptyPath { .. })));
        assert!(matches!(
            "local:../hda_local.h".parse::<CandidateRef>(),
            Err(LocatorError::EscapesRoot { .. })
        ));
        assert!(matches!(
            "local:/abs/hda_local.h".parse::<CandidateRef>(),
            Err(LocatorError::AbsoluteLocal { .. })
        ));
    }

    #[test]
    fn rejects_locators_that_break_the_directive() {
        for locator in [
            "sys:sound/hda_local.h>\n#include <evil.h",
            "local:hda\"local.h",
            "sys:sound/<hda>.h",
            "local:hda_local.h\r",
            "sys:sound/hda\nlocal.h",
        ] {
            assert!(
                matches!(locator.parse::<CandidateRef>(), Err(LocatorError::InvalidCharacter { .. })),
                "{locator:?} should be rejected"
            );
        }
    }
}
