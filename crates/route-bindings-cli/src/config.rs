//! Project-level route binding configuration loaded from YAML or TOML.
//!
//! Keeps project-specific knobs (where the manifest lives, the override
//! parameter, query array style, registry-wide defaults) next to the route
//! manifest instead of in Rust source.
//!
//! # File format
//!
//! ```yaml
//! # route-bindings.yaml
//! manifest: routes.json
//!
//! # Query parameter carrying the spoofed method of HTML forms.
//! override_param: _method
//!
//! # `brackets` (tags[]=a) or `indices` (tags[0]=a).
//! array_format: brackets
//!
//! # Registry-wide placeholder defaults; override the manifest's own.
//! url_defaults:
//!   locale: en
//!
//! # Default log filter for the CLI (`-v` / `RUST_LOG` take precedence).
//! log_level: warn
//!
//! codegen:
//!   runtime_crate: route_bindings
//!   registry_name: ROUTES
//!   source_comments: true
//!   output: src/routes.rs
//! ```
//!
//! The same keys work in TOML when the file ends in `.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use route_bindings::{ArrayFormat, RouteManifest, RouteRegistry, Scalar};
use route_bindings_build::BindingsCodegenConfig;
use serde::Deserialize;

/// Project-level route binding config.
///
/// Loaded via [`ProjectConfig::load`]; relative paths in the file are
/// resolved against the file's directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Route manifest path (JSON or YAML).
    pub manifest: PathBuf,

    /// Method-override parameter name (runtime default: `_method`).
    pub override_param: Option<String>,

    /// Array keying in query strings.
    pub array_format: ArrayFormat,

    /// Registry-wide placeholder defaults, layered over the manifest's.
    pub url_defaults: BTreeMap<String, Scalar>,

    /// Default `tracing` filter directive for the CLI.
    pub log_level: String,

    /// Code generation settings.
    pub codegen: CodegenSection,
}

/// The `codegen` section of [`ProjectConfig`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CodegenSection {
    /// Runtime crate path used by generated code.
    pub runtime_crate: Option<String>,

    /// Name of the generated registry static.
    pub registry_name: Option<String>,

    /// Mention handler source locations in generated docs.
    pub source_comments: bool,

    /// Default output path of `route-bindings generate`.
    pub output: Option<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("routes.json"),
            override_param: None,
            array_format: ArrayFormat::Brackets,
            url_defaults: BTreeMap::new(),
            log_level: "warn".to_string(),
            codegen: CodegenSection::default(),
        }
    }
}

impl Default for CodegenSection {
    fn default() -> Self {
        Self {
            runtime_crate: None,
            registry_name: None,
            source_comments: true,
            output: None,
        }
    }
}

impl ProjectConfig {
    /// Load config from a YAML (default) or TOML (`.toml`) file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let mut config: Self = if is_toml {
            toml::from_str(&content)?
        } else {
            serde_yaml_ng::from_str(&content)?
        };

        if let Some(base) = path.parent() {
            config.manifest = base.join(&config.manifest);
            if let Some(output) = &config.codegen.output {
                config.codegen.output = Some(base.join(output));
            }
        }
        tracing::debug!(config = %path.display(), manifest = %config.manifest.display(), "loaded project config");
        Ok(config)
    }

    /// Load the manifest named by [`manifest`](Self::manifest).
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn load_manifest(&self) -> crate::error::Result<RouteManifest> {
        Ok(RouteManifest::load(&self.manifest)?)
    }

    /// Load the manifest and build a registry with this config applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded or validated.
    pub fn registry(&self) -> crate::error::Result<RouteRegistry> {
        self.registry_from(&self.load_manifest()?)
    }

    /// Build a registry from an already-loaded manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest fails validation.
    pub fn registry_from(&self, manifest: &RouteManifest) -> crate::error::Result<RouteRegistry> {
        let mut builder = RouteRegistry::builder().array_format(self.array_format);
        if let Some(param) = &self.override_param {
            builder = builder.override_param(param.as_str());
        }
        for (name, value) in self.layered_defaults(manifest) {
            builder = builder.url_default(name, value);
        }
        for definition in manifest.definitions()? {
            builder = builder.route(definition);
        }
        Ok(builder.build()?)
    }

    /// The manifest with this config's URL defaults layered over its own,
    /// as fed to code generation.
    #[must_use]
    pub fn effective_manifest(&self, manifest: &RouteManifest) -> RouteManifest {
        let mut effective = manifest.clone();
        effective.defaults = self.layered_defaults(manifest);
        effective
    }

    /// Codegen settings derived from this config.
    #[must_use]
    pub fn codegen_config(&self) -> BindingsCodegenConfig {
        let mut config = BindingsCodegenConfig::new()
            .source_comments(self.codegen.source_comments)
            .array_indices(self.array_format == ArrayFormat::Indices);
        if let Some(rt) = &self.codegen.runtime_crate {
            config = config.runtime_crate(rt);
        }
        if let Some(name) = &self.codegen.registry_name {
            config = config.registry_name(name);
        }
        if let Some(param) = &self.override_param {
            config = config.override_param(param);
        }
        config
    }

    fn layered_defaults(&self, manifest: &RouteManifest) -> BTreeMap<String, Scalar> {
        let mut defaults = manifest.defaults.clone();
        defaults.extend(self.url_defaults.clone());
        defaults
    }
}
