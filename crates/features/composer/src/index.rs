use hdac_domain::ComposedSource;

/// Reports which symbol names a composed source makes visible.
///
/// Used by the fallback guard: a fallback is only emitted when no earlier source
/// defines its name. Implementations must be deterministic and, like the probe,
/// treat unreadable sources as defining nothing.
pub trait SymbolIndex {
    fn symbols(&self, source: &ComposedSource) -> Vec<String>;
}

impl<I: SymbolIndex + ?Sized> SymbolIndex for &I {
    fn symbols(&self, source: &ComposedSource) -> Vec<String> {
        (**self).symbols(source)
    }
}
