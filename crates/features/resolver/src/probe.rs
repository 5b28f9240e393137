use hdac_domain::CandidateRef;
use std::path::PathBuf;

/// Existence check against the build environment.
///
/// Implementations look only at whether a candidate is reachable, never at what it
/// contains, and must answer the same way every time within a run. Environment-level
/// I/O failures are reported as "does not exist".
pub trait Probe {
    /// Physical location of the candidate, if the environment knows one.
    fn locate(&self, candidate: &CandidateRef) -> Option<PathBuf>;

    /// Whether the candidate exists.
    ///
    /// Environments that cannot report paths override this and return `None` from
    /// [`Probe::locate`].
    fn probe(&self, candidate: &CandidateRef) -> bool {
        self.locate(candidate).is_some()
    }
}

impl<P: Probe + ?Sized> Probe for &P {
    fn locate(&self, candidate: &CandidateRef) -> Option<PathBuf> {
        (**self).locate(candidate)
    }

    fn probe(&self, candidate: &CandidateRef) -> bool {
        (**self).probe(candidate)
    }
}
