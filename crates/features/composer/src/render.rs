use hdac_domain::{CompositeNamespace, Directive, FallbackDefinition, FallbackSymbol, SourceOrigin};
use std::fmt;

const BANNER: &str = "/* Generated by hdac. Do not edit: regenerate from the manifest instead. */";

/// Renders the namespace as a C header.
///
/// Includes come first, in composition order, followed by each applied fallback
/// wrapped in its own `#ifndef` guard.
#[must_use]
pub fn render(ns: &CompositeNamespace, guard: Option<&str>) -> String {
    Header { ns, guard }.to_string()
}

struct Header<'a> {
    ns: &'a CompositeNamespace,
    guard: Option<&'a str>,
}

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{BANNER}")?;
        if let Some(guard) = self.guard {
            writeln!(f, "#ifndef {guard}\n#define {guard}")?;
        }

        let mut origins = self.ns.sources().iter().map(|s| &s.origin);
        let mut in_includes = false;
        for directive in self.ns.directives() {
            match directive {
                Directive::Include(candidate) => {
                    if !in_includes {
                        writeln!(f)?;
                        in_includes = true;
                    }
                    write!(f, "#include {}", candidate.include_spelling())?;
                    if let Some(SourceOrigin::Dependency(name)) = origins.next() {
                        write!(f, " /* {name} */")?;
                    }
                    writeln!(f)?;
                },
                Directive::Define(symbol) => {
                    writeln!(f)?;
                    define(f, symbol)?;
                },
            }
        }

        if let Some(guard) = self.guard {
            writeln!(f, "\n#endif /* {guard} */")?;
        }
        Ok(())
    }
}

fn define(f: &mut fmt::Formatter<'_>, symbol: &FallbackSymbol) -> fmt::Result {
    let name = &symbol.name;
    writeln!(f, "#ifndef {name}")?;
    match &symbol.definition {
        FallbackDefinition::Constant { value } => writeln!(f, "#define {name} {value}")?,
        FallbackDefinition::Function { params, body, .. } => {
            writeln!(f, "#define {name}({}) ({body})", params.join(", "))?;
        },
    }
    writeln!(f, "#endif")
}
