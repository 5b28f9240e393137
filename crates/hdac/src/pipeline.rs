use crate::error::PipelineError;
use hdac_composer::{FallbackLayer, SymbolIndex, compose, render};
use hdac_domain::{CompositeNamespace, ResolutionResult};
use hdac_manifest::Manifest;
use hdac_resolver::{Probe, Resolver};
use private::Sealed;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Default)]
pub struct NoEnv;
#[derive(Debug)]
pub struct WithEnv<E>(E);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoEnv {}
impl<E> Sealed for WithEnv<E> {}

/// Everything one run produces.
#[derive(Debug, Clone, Serialize)]
pub struct Composition {
    /// One entry per dependency, in manifest order.
    pub results: Vec<ResolutionResult>,
    pub namespace: CompositeNamespace,
    /// The rendered header.
    pub header: String,
}

/// A single build-configuration pass over one manifest.
///
/// Nothing is shared between runs; resolving the same manifest against the same
/// environment twice yields identical output.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct Pipeline<'m, S: Sealed = NoEnv> {
    manifest: &'m Manifest,
    state: S,
}

impl<'m> Pipeline<'m, NoEnv> {
    #[must_use = "Creates a pipeline that still needs an environment"]
    pub const fn new(manifest: &'m Manifest) -> Self {
        Self { manifest, state: NoEnv }
    }

    #[must_use = "Sets the environment candidates are probed in"]
    pub fn environment<E>(self, env: E) -> Pipeline<'m, WithEnv<E>>
    where
        E: Probe + SymbolIndex,
    {
        Pipeline { manifest: self.manifest, state: WithEnv(env) }
    }
}

impl<E> Pipeline<'_, WithEnv<E>>
where
    E: Probe + SymbolIndex,
{
    #[must_use]
    pub const fn env(&self) -> &E {
        &self.state.0
    }

    /// Resolves every dependency without composing anything.
    ///
    /// # Errors
    /// Returns [`PipelineError::Resolution`] when a mandatory dependency is missing.
    pub fn resolve(&self) -> Result<Vec<ResolutionResult>, PipelineError> {
        Ok(Resolver::new(self.env()).resolve_all(self.manifest.dependencies())?)
    }

    /// Resolves, composes, applies fallbacks and renders the header.
    ///
    /// # Errors
    /// Returns [`PipelineError::Resolution`] when a mandatory dependency is missing and
    /// [`PipelineError::Compose`] when a needed fallback lacks one of its primitives.
    pub fn run(&self) -> Result<Composition, PipelineError> {
        let results = self.resolve()?;
        let env = self.env();

        let namespace = compose(self.manifest.base(), &results, env, env);
        let namespace = FallbackLayer::new()
            .with_ambient(self.manifest.host_symbols().iter().cloned())
            .apply(namespace, self.manifest.fallbacks())?;
        let header = render(&namespace, self.manifest.guard());

        info!(
            sources = namespace.sources().len(),
            fallbacks = namespace.fallbacks().len(),
            bytes = header.len(),
            "Composition complete"
        );
        Ok(Composition { results, namespace, header })
    }
}
