use serde::{Deserialize, Serialize};

/// When a fallback definition may be emitted.
///
/// Only one guard exists: the definition is added iff no composed source and
/// no host-provided symbol already makes the name visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Guard {
    #[default]
    #[serde(rename = "if-undefined")]
    IfUndefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Constant,
    Function,
}

/// The body of a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackDefinition {
    /// An object-like macro: `#define NAME value`.
    Constant { value: String },
    /// A function-like macro over primitives that must already be visible.
    Function { params: Vec<String>, body: String, requires: Vec<String> },
}

/// A default definition supplied only when nothing else provides the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FallbackSymbol {
    pub name: String,
    #[serde(flatten)]
    pub definition: FallbackDefinition,
    pub guard: Guard,
}

impl FallbackSymbol {
    pub fn constant(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: FallbackDefinition::Constant { value: value.into() },
            guard: Guard::IfUndefined,
        }
    }

    pub fn function(
        name: impl Into<String>,
        params: Vec<String>,
        body: impl Into<String>,
        requires: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            definition: FallbackDefinition::Function { params, body: body.into(), requires },
            guard: Guard::IfUndefined,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> SymbolKind {
        match self.definition {
            FallbackDefinition::Constant { .. } => SymbolKind::Constant,
            FallbackDefinition::Function { .. } => SymbolKind::Function,
        }
    }

    /// Primitives the definition is written in terms of. Empty for constants.
    #[must_use]
    pub fn requires(&self) -> &[String] {
        match &self.definition {
            FallbackDefinition::Constant { .. } => &[],
            FallbackDefinition::Function { requires, .. } => requires,
        }
    }
}
