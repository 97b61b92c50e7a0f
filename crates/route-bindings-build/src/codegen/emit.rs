//! Rust source emission for route bindings.

use std::collections::BTreeMap;

use route_bindings_core::{RouteDefinition, Scalar};

use super::config::BindingsCodegenConfig;
use super::types::{ModuleTree, RouteFn};

/// Render the complete bindings file.
pub(super) fn generate_code(
    definitions: &[RouteDefinition],
    url_defaults: &BTreeMap<String, Scalar>,
    tree: &ModuleTree<'_>,
    config: &BindingsCodegenConfig,
) -> String {
    let mut out = String::with_capacity(4096 + definitions.len() * 512);

    out.push_str("// @generated by route-bindings-build. Do not edit.\n\n");
    emit_registry(&mut out, definitions, url_defaults, config);
    emit_route_names(&mut out, definitions);
    emit_module_body(&mut out, tree, &[], config);

    out
}

fn emit_registry(
    out: &mut String,
    definitions: &[RouteDefinition],
    url_defaults: &BTreeMap<String, Scalar>,
    config: &BindingsCodegenConfig,
) {
    let rt = &config.runtime_crate;
    let name = &config.registry_name;

    out.push_str("/// Route table mirrored from the server.\n");
    out.push_str(&format!(
        "pub static {name}: ::std::sync::LazyLock<{rt}::RouteRegistry> =\n    \
         ::std::sync::LazyLock::new(|| {{\n"
    ));
    out.push_str(&format!(
        "        fn build() -> ::core::result::Result<{rt}::RouteRegistry, {rt}::ManifestError> {{\n"
    ));
    out.push_str(&format!("            {rt}::RouteRegistry::builder()\n"));

    if let Some(param) = &config.override_param {
        out.push_str(&format!("                .override_param({param:?})\n"));
    }
    if config.array_indices {
        out.push_str(&format!(
            "                .array_format({rt}::ArrayFormat::Indices)\n"
        ));
    }
    for (param, value) in url_defaults {
        out.push_str(&format!(
            "                .url_default({param:?}, {})\n",
            scalar_literal(value)
        ));
    }
    for def in definitions {
        out.push_str(&format!(
            "                .route({})\n",
            definition_expr(def, rt)
        ));
    }

    out.push_str("                .build()\n");
    out.push_str("        }\n");
    out.push_str(&format!(
        "        build().unwrap_or_else(|err| panic!(\"invalid route table in {name}: {{err}}\"))\n"
    ));
    out.push_str("    });\n\n");
}

/// `RouteDefinition::new(..)?` with chained defaults and source.
fn definition_expr(def: &RouteDefinition, rt: &str) -> String {
    let methods = def
        .methods()
        .iter()
        .map(|m| format!("{rt}::Method::{m:?}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut expr = format!(
        "{rt}::RouteDefinition::new({:?}, &[{methods}], {:?})?",
        def.name(),
        def.url()
    );
    for (param, value) in def.defaults() {
        expr.push_str(&format!(
            ".with_default({param:?}, {})?",
            scalar_literal(value)
        ));
    }
    if let Some(source) = def.source() {
        let line = match source.line {
            Some(n) => format!("::core::option::Option::Some({n})"),
            None => "::core::option::Option::None".to_string(),
        };
        expr.push_str(&format!(
            ".with_source({rt}::SourceLocation {{ file: ::std::string::String::from({:?}), line: {line} }})",
            source.file
        ));
    }
    expr
}

fn scalar_literal(value: &Scalar) -> String {
    match value {
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(n) => format!("{n}_i64"),
        Scalar::Float(x) => format!("{x:?}_f64"),
        Scalar::Str(s) => format!("{s:?}"),
    }
}

fn emit_route_names(out: &mut String, definitions: &[RouteDefinition]) {
    out.push_str("/// Every route identifier, in declaration order.\n");
    out.push_str("pub const ROUTE_NAMES: &[&str] = &[\n");
    for def in definitions {
        out.push_str(&format!("    {:?},\n", def.name()));
    }
    out.push_str("];\n");
}

fn emit_module_body(
    out: &mut String,
    tree: &ModuleTree<'_>,
    path: &[&str],
    config: &BindingsCodegenConfig,
) {
    let indent = "    ".repeat(path.len());
    let registry = format!("{}{}", "super::".repeat(path.len()), config.registry_name);

    for func in &tree.functions {
        out.push('\n');
        emit_function(out, func, &indent, &registry, config);
    }

    for (name, child) in &tree.children {
        out.push('\n');
        let mut child_path = path.to_vec();
        child_path.push(name.as_str());
        out.push_str(&format!("{indent}/// Routes under `{}`.\n", child_path.join("::")));
        out.push_str(&format!("{indent}pub mod {name} {{\n"));
        emit_module_body(out, child, &child_path, config);
        out.push_str(&format!("{indent}}}\n"));
    }
}

fn emit_function(
    out: &mut String,
    func: &RouteFn<'_>,
    indent: &str,
    registry: &str,
    config: &BindingsCodegenConfig,
) {
    let def = func.definition;
    let rt = &config.runtime_crate;
    let methods = def
        .methods()
        .iter()
        .map(|m| m.as_upper())
        .collect::<Vec<_>>()
        .join("|");

    out.push_str(&format!("{indent}/// `{methods} {}`\n", def.url()));
    out.push_str(&format!("{indent}///\n{indent}/// Route `{}`.", def.name()));
    if config.source_comments {
        if let Some(source) = def.source() {
            out.push_str(&format!(" Handled at `{source}`."));
        }
    }
    out.push('\n');
    out.push_str(&format!("{indent}#[must_use]\n"));
    out.push_str(&format!(
        "{indent}pub fn {}() -> {rt}::Endpoint<'static> {{\n",
        func.ident
    ));
    out.push_str(&format!(
        "{indent}    {registry}\n{indent}        .try_endpoint({:?})\n{indent}        .unwrap_or_else(|err| panic!(\"{{err}}\"))\n",
        def.name()
    ));
    out.push_str(&format!("{indent}}}\n"));
}
