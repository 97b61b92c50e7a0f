//! Build-script helpers.

use std::path::Path;

use route_bindings_core::RouteManifest;

use crate::codegen::{generate_from_manifest, BindingsCodegenConfig, GenerateError};

/// Read a route manifest, generate bindings and write them to `out_path`.
///
/// This is the whole `build.rs` flow:
///
/// ```ignore
/// fn main() {
///     let out = std::path::Path::new(&std::env::var("OUT_DIR").unwrap()).join("routes.rs");
///     route_bindings_build::write_bindings(
///         "routes.json",
///         &out,
///         &route_bindings_build::BindingsCodegenConfig::new(),
///     );
/// }
/// ```
///
/// and in the crate:
///
/// ```ignore
/// pub mod routes {
///     include!(concat!(env!("OUT_DIR"), "/routes.rs"));
/// }
/// ```
///
/// The manifest format is picked by extension (`.yaml`/`.yml` → YAML,
/// otherwise JSON). Prints `cargo:rerun-if-changed` for the manifest.
///
/// # Panics
///
/// Panics if the manifest cannot be read or validated, or the output cannot
/// be written. Use [`try_write_bindings`] for a fallible alternative.
pub fn write_bindings(
    manifest_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    config: &BindingsCodegenConfig,
) {
    if let Err(err) = try_write_bindings(manifest_path, out_path, config) {
        panic!("failed to generate route bindings: {err}");
    }
}

/// Fallible version of [`write_bindings`].
///
/// # Errors
///
/// Returns [`GenerateError`] if the manifest cannot be loaded, generation
/// fails, or the output file cannot be written.
pub fn try_write_bindings(
    manifest_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    config: &BindingsCodegenConfig,
) -> Result<(), GenerateError> {
    let manifest_path = manifest_path.as_ref();
    let out_path = out_path.as_ref();

    println!("cargo:rerun-if-changed={}", manifest_path.display());

    let manifest = RouteManifest::load(manifest_path)?;
    let code = generate_from_manifest(&manifest, config)?;

    std::fs::write(out_path, code).map_err(|source| GenerateError::Write {
        path: out_path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "route_bindings_build_{name}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn writes_bindings_from_yaml_manifest() {
        let dir = temp_dir("yaml");
        let manifest = dir.join("routes.yaml");
        let out = dir.join("routes.rs");
        std::fs::write(
            &manifest,
            indoc! {r#"
                routes:
                  - name: stock.imprimir
                    methods: [get]
                    url: /stock/imprimir
            "#},
        )
        .unwrap();

        try_write_bindings(&manifest, &out, &BindingsCodegenConfig::new()).unwrap();

        let code = std::fs::read_to_string(&out).unwrap();
        assert!(code.contains("pub fn imprimir()"));
        syn::parse_file(&code).expect("written bindings should be valid Rust syntax");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = temp_dir("missing");
        let err = try_write_bindings(
            dir.join("nope.json"),
            dir.join("routes.rs"),
            &BindingsCodegenConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::Manifest(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let dir = temp_dir("unwritable");
        let manifest = dir.join("routes.json");
        std::fs::write(&manifest, r#"{ "routes": [] }"#).unwrap();

        let err = try_write_bindings(
            &manifest,
            dir.join("no-such-dir").join("routes.rs"),
            &BindingsCodegenConfig::new(),
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::Write { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    #[should_panic(expected = "failed to generate route bindings")]
    fn write_bindings_panics_on_error() {
        let dir = temp_dir("panics");
        write_bindings(
            dir.join("nope.json"),
            dir.join("routes.rs"),
            &BindingsCodegenConfig::new(),
        );
    }
}
