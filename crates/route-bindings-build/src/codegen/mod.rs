//! Build-time route binding generator.
//!
//! Reads the server's route manifest and generates a Rust module with one
//! endpoint function per route, backed by a single static registry.
//!
//! # Architecture
//!
//! Generated code is declarative: the route table becomes a `LazyLock`
//! registry and every endpoint function is a one-line lookup. All resolution
//! logic stays in the `route-bindings` runtime, so the generator only has to
//! get names and literals right.

mod config;
mod emit;
mod types;

pub use config::{BindingsCodegenConfig, GenerateError};

use route_bindings_core::RouteManifest;

use types::ModuleTree;

/// Generate route bindings from a JSON route manifest.
///
/// Returns Rust source code to be written to `OUT_DIR/routes.rs` and
/// `include!`d by the consuming crate.
///
/// # Errors
///
/// Returns [`GenerateError`] if:
/// - the manifest is not valid JSON or fails validation
/// - two routes map to the same generated item
/// - the config holds an invalid identifier or path
pub fn generate(
    manifest_json: &str,
    config: &BindingsCodegenConfig,
) -> Result<String, GenerateError> {
    let manifest = RouteManifest::from_json_str(manifest_json)?;
    generate_from_manifest(&manifest, config)
}

/// Generate route bindings from an already-parsed manifest.
///
/// # Errors
///
/// Same as [`generate`], minus JSON parsing.
pub fn generate_from_manifest(
    manifest: &RouteManifest,
    config: &BindingsCodegenConfig,
) -> Result<String, GenerateError> {
    config.validate()?;

    let definitions = manifest.definitions()?;
    let mut tree = ModuleTree::default();
    for def in &definitions {
        let path: Vec<String> = def.name().split('.').map(to_ident).collect();
        tree.insert(&path, def)?;
    }

    Ok(emit::generate_code(
        &definitions,
        &manifest.defaults,
        &tree,
        config,
    ))
}

/// Convert `CamelCase` to `snake_case`; non-camel input passes through.
pub(crate) fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1);
            // Break after a lowercase letter or digit ("show|Profile"), or
            // at the last capital of an acronym ("HTML|Parser").
            let after_word = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            let ends_acronym =
                prev.is_some_and(char::is_uppercase) && next.is_some_and(|n| n.is_lowercase());
            if (after_word || ends_acronym) && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Keywords that cannot be raw identifiers; they get a trailing `_`.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "super"];

/// Strict and reserved keywords, escaped as `r#kw`.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Convert one dotted route-name segment into a Rust identifier.
///
/// `crear-funcionalidad` → `crear_funcionalidad`, `showProfile` →
/// `show_profile`, `2fa` → `_2fa`, `type` → `r#type`.
pub(crate) fn to_ident(segment: &str) -> String {
    let mut ident: String = to_snake_case(segment)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if ident.chars().all(|c| c == '_') {
        ident.push_str("route");
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}
