//! Internal types used during codegen — not part of the public API.

use std::collections::BTreeMap;

use route_bindings_core::RouteDefinition;

use super::config::GenerateError;

/// One generated endpoint function.
#[derive(Debug)]
pub struct RouteFn<'a> {
    /// Function name as emitted (may be a raw identifier, e.g. `r#type`).
    pub ident: String,
    /// The route it resolves.
    pub definition: &'a RouteDefinition,
}

/// Generated module nesting, keyed by sanitized module identifier.
#[derive(Debug, Default)]
pub struct ModuleTree<'a> {
    /// Endpoint functions declared directly in this module.
    pub functions: Vec<RouteFn<'a>>,
    /// Child modules in name order.
    pub children: BTreeMap<String, ModuleTree<'a>>,
}

impl<'a> ModuleTree<'a> {
    /// Place `definition` at `path` (module idents followed by the function ident).
    pub fn insert(
        &mut self,
        path: &[String],
        definition: &'a RouteDefinition,
    ) -> Result<(), GenerateError> {
        let Some((ident, modules)) = path.split_last() else {
            return Err(GenerateError::Config(format!(
                "route '{}' has an empty name",
                definition.name()
            )));
        };

        let mut module = self;
        for m in modules {
            module = module.children.entry(m.clone()).or_default();
        }

        if let Some(existing) = module.functions.iter().find(|f| f.ident == *ident) {
            return Err(GenerateError::NameCollision {
                path: path.join("::"),
                first: existing.definition.name().to_string(),
                second: definition.name().to_string(),
            });
        }

        module.functions.push(RouteFn {
            ident: ident.clone(),
            definition,
        });
        Ok(())
    }
}
