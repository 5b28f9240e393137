use crate::error::ResolutionError;
use crate::probe::Probe;
use hdac_domain::{LogicalDependency, ResolutionResult};
use tracing::{info, instrument, trace, warn};

/// Resolves logical dependencies against one probe environment.
#[derive(Debug, Clone)]
pub struct Resolver<P> {
    probe: P,
}

impl<P: Probe> Resolver<P> {
    pub const fn new(probe: P) -> Self {
        Self { probe }
    }

    #[must_use]
    pub const fn probe(&self) -> &P {
        &self.probe
    }

    /// Commits to the first candidate, in declared order, that the probe finds.
    ///
    /// Later candidates are never consulted once one hits, even if they exist too.
    ///
    /// # Errors
    /// Returns [`ResolutionError::Unresolved`] when the dependency is mandatory and no
    /// candidate exists. The error lists every attempted candidate in probe order.
    #[instrument(level = "debug", skip_all, fields(dependency = %dependency.name))]
    pub fn resolve(
        &self,
        dependency: &LogicalDependency,
    ) -> Result<ResolutionResult, ResolutionError> {
        for candidate in &dependency.candidates {
            if !self.probe.probe(candidate) {
                trace!(%candidate, "Candidate not found");
                continue;
            }

            let location = self.probe.locate(candidate);
            info!(%candidate, location = ?location, "Candidate selected");
            return Ok(ResolutionResult::found(dependency.clone(), candidate.clone(), location));
        }

        if dependency.mandatory {
            return Err(ResolutionError::Unresolved {
                name: dependency.name.clone(),
                attempted: dependency.candidates.clone(),
                context: None,
            });
        }

        warn!(
            dependency = %dependency.name,
            attempted = dependency.candidates.len(),
            "Optional dependency not found, skipping"
        );
        Ok(ResolutionResult::missing(dependency.clone()))
    }

    /// Resolves every dependency in manifest order.
    ///
    /// Stops at the first mandatory failure; nothing resolved before it is returned.
    ///
    /// # Errors
    /// See [`Resolver::resolve`].
    pub fn resolve_all<'a, I>(&self, dependencies: I) -> Result<Vec<ResolutionResult>, ResolutionError>
    where
        I: IntoIterator<Item = &'a LogicalDependency>,
    {
        let results = dependencies
            .into_iter()
            .map(|dep| self.resolve(dep))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            resolved = results.iter().filter(|r| r.is_resolved()).count(),
            total = results.len(),
            "Dependencies resolved"
        );
        Ok(results)
    }
}
