use crate::error::ComposeError;
use fxhash::FxHashSet;
use hdac_domain::{CompositeNamespace, FallbackSymbol, Guard};
use tracing::{debug, info};

/// Fallback Definition Layer.
///
/// Appends a default definition for every symbol that neither the composed sources nor
/// the host environment make visible. Applying the same symbols again is a no-op, since
/// each definition added in one pass is visible to the next.
#[derive(Debug, Clone, Default)]
pub struct FallbackLayer {
    ambient: FxHashSet<String>,
}

impl FallbackLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names presumed supplied by the host build environment.
    #[must_use]
    pub fn with_ambient<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ambient.extend(names.into_iter().map(Into::into));
        self
    }

    fn is_defined(&self, ns: &CompositeNamespace, name: &str) -> bool {
        ns.is_visible(name) || self.ambient.contains(name)
    }

    /// Applies `symbols` in order on top of `ns`.
    ///
    /// # Errors
    /// Returns [`ComposeError::UnmetPrimitive`] when a function fallback is needed but
    /// one of the primitives it is written in terms of is not visible.
    pub fn apply(
        &self,
        mut ns: CompositeNamespace,
        symbols: &[FallbackSymbol],
    ) -> Result<CompositeNamespace, ComposeError> {
        let mut applied = 0usize;

        for symbol in symbols {
            match symbol.guard {
                Guard::IfUndefined if self.is_defined(&ns, &symbol.name) => {
                    debug!(symbol = %symbol.name, "Already defined, fallback skipped");
                    continue;
                },
                Guard::IfUndefined => {},
            }

            if let Some(primitive) = symbol.requires().iter().find(|p| !self.is_defined(&ns, p)) {
                return Err(ComposeError::UnmetPrimitive {
                    symbol: symbol.name.clone(),
                    primitive: primitive.clone(),
                    context: None,
                });
            }

            debug!(symbol = %symbol.name, kind = ?symbol.kind(), "Fallback applied");
            ns.push_fallback(symbol.clone());
            applied += 1;
        }

        info!(applied, skipped = symbols.len() - applied, "Fallback layer applied");
        Ok(ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fixup_actions() -> Vec<FallbackSymbol> {
        ["HDA_FIXUP_ACT_PRE_PROBE", "HDA_FIXUP_ACT_PROBE", "HDA_FIXUP_ACT_INIT"]
            .iter()
            .enumerate()
            .map(|(i, name)| FallbackSymbol::constant(*name, i.to_string()))
            .collect()
    }

    fn write_cache() -> FallbackSymbol {
        FallbackSymbol::function(
            "snd_hda_codec_write_cache",
            vec!["codec".to_owned(), "nid".to_owned()],
            "snd_hda_codec_write(codec, nid)",
            vec!["snd_hda_codec_write".to_owned()],
        )
    }

    #[test]
    fn defines_only_what_is_missing() {
        let mut ns = CompositeNamespace::new();
        ns.declare_visible(["HDA_FIXUP_ACT_PROBE"]);

        let ns = FallbackLayer::new().apply(ns, &fixup_actions()).unwrap();
        let names: Vec<&str> = ns.fallbacks().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["HDA_FIXUP_ACT_PRE_PROBE", "HDA_FIXUP_ACT_INIT"]);
    }

    #[test]
    fn ambient_symbols_are_never_overridden() {
        let layer = FallbackLayer::new().with_ambient(["HDA_FIXUP_ACT_INIT"]);
        let ns = layer.apply(CompositeNamespace::new(), &fixup_actions()).unwrap();
        assert!(ns.fallbacks().iter().all(|f| f.name != "HDA_FIXUP_ACT_INIT"));
    }

    #[test]
    fn function_requires_a_visible_primitive() {
        let err = FallbackLayer::new().apply(CompositeNamespace::new(), &[write_cache()]).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::UnmetPrimitive { ref primitive, .. } if primitive == "snd_hda_codec_write"
        ));

        let mut ns = CompositeNamespace::new();
        ns.declare_visible(["snd_hda_codec_write"]);
        let ns = FallbackLayer::new().apply(ns, &[write_cache()]).unwrap();
        assert_eq!(ns.fallbacks().len(), 1);
    }

    #[test]
    fn defined_function_skips_requirement_check() {
        let mut ns = CompositeNamespace::new();
        ns.declare_visible(["snd_hda_codec_write_cache"]);
        let ns = FallbackLayer::new().apply(ns, &[write_cache()]).unwrap();
        assert!(ns.fallbacks().is_empty());
    }

    proptest! {
        #[test]
        fn second_pass_is_a_no_op(visible in proptest::collection::vec(any::<bool>(), 3)) {
            let symbols = fixup_actions();
            let mut ns = CompositeNamespace::new();
            for (symbol, shown) in symbols.iter().zip(&visible) {
                if *shown {
                    ns.declare_visible([symbol.name.clone()]);
                }
            }

            let layer = FallbackLayer::new();
            let once = layer.apply(ns, &symbols).unwrap();
            let twice = layer.apply(once.clone(), &symbols).unwrap();
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn present_iff_not_already_visible(visible in proptest::collection::vec(any::<bool>(), 3)) {
            let symbols = fixup_actions();
            let mut ns = CompositeNamespace::new();
            for (symbol, shown) in symbols.iter().zip(&visible) {
                if *shown {
                    ns.declare_visible([symbol.name.clone()]);
                }
            }

            let ns = FallbackLayer::new().apply(ns, &symbols).unwrap();
            for (symbol, shown) in symbols.iter().zip(&visible) {
                let emitted = ns.fallbacks().iter().filter(|f| f.name == symbol.name).count();
                prop_assert_eq!(emitted, usize::from(!*shown));
            }
        }
    }
}
