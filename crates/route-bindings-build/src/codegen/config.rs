//! Configuration for route binding code generation.

use std::path::PathBuf;

use route_bindings_core::ManifestError;

/// Error returned by [`generate`](super::generate).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// The manifest could not be read, parsed or validated.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Two routes map to the same Rust item after name sanitization.
    #[error(
        "routes '{first}' and '{second}' both map to `{path}`; \
         rename one of them in the route table"
    )]
    NameCollision {
        /// The generated item path (e.g., `users::show`).
        path: String,
        /// The route that claimed the path first.
        first: String,
        /// The route that collided with it.
        second: String,
    },

    /// Generated code could not be written.
    #[error("failed to write bindings to {}: {source}", path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Generic configuration error.
    #[error("{0}")]
    Config(String),
}

/// Configuration for route binding code generation.
///
/// All project-specific choices (where the runtime lives, what the registry
/// static is called) are passed in rather than hardcoded.
///
/// # Examples
///
/// ```ignore
/// let config = BindingsCodegenConfig::new()
///     .runtime_crate("crate::routing")
///     .registry_name("API_ROUTES")
///     .override_param("_verb");
///
/// let code = route_bindings_build::generate(&manifest_json, &config)?;
/// ```
#[derive(Clone, Debug)]
pub struct BindingsCodegenConfig {
    /// Path to the runtime crate/module (default: `"route_bindings"`).
    ///
    /// Generated code references `{runtime_crate}::RouteRegistry`, etc.
    pub(crate) runtime_crate: String,

    /// Name of the generated registry static (default: `"ROUTES"`).
    pub(crate) registry_name: String,

    /// Method-override parameter baked into the registry.
    ///
    /// When `None`, the runtime default (`_method`) applies.
    pub(crate) override_param: Option<String>,

    /// Whether doc comments mention the server-side source location
    /// (default: `true`).
    pub(crate) source_comments: bool,

    /// Key query arrays by index (`tags[0]=a`) instead of `tags[]=a`.
    pub(crate) array_indices: bool,
}

impl Default for BindingsCodegenConfig {
    fn default() -> Self {
        Self {
            runtime_crate: "route_bindings".to_string(),
            registry_name: "ROUTES".to_string(),
            override_param: None,
            source_comments: true,
            array_indices: false,
        }
    }
}

impl BindingsCodegenConfig {
    /// Create a new config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime crate/module path used by generated code.
    ///
    /// Default: `"route_bindings"`. Set to `"crate::routing"` if the runtime
    /// is re-exported from inside the consuming crate.
    #[must_use]
    pub fn runtime_crate(mut self, path: &str) -> Self {
        self.runtime_crate = path.to_string();
        self
    }

    /// Set the name of the generated registry static (default: `"ROUTES"`).
    #[must_use]
    pub fn registry_name(mut self, name: &str) -> Self {
        self.registry_name = name.to_string();
        self
    }

    /// Set the method-override query parameter name.
    #[must_use]
    pub fn override_param(mut self, name: &str) -> Self {
        self.override_param = Some(name.to_string());
        self
    }

    /// Toggle source locations in generated doc comments.
    #[must_use]
    pub const fn source_comments(mut self, enabled: bool) -> Self {
        self.source_comments = enabled;
        self
    }

    /// Make the generated registry key query arrays by index.
    #[must_use]
    pub const fn array_indices(mut self, enabled: bool) -> Self {
        self.array_indices = enabled;
        self
    }

    /// Reject values that would produce invalid Rust.
    pub(crate) fn validate(&self) -> Result<(), GenerateError> {
        if !is_plain_ident(&self.registry_name) {
            return Err(GenerateError::Config(format!(
                "registry_name '{}' is not a valid Rust identifier",
                self.registry_name
            )));
        }
        let path_ok = !self.runtime_crate.is_empty()
            && self.runtime_crate.split("::").all(is_plain_ident);
        if !path_ok {
            return Err(GenerateError::Config(format!(
                "runtime_crate '{}' is not a valid Rust path",
                self.runtime_crate
            )));
        }
        Ok(())
    }
}

fn is_plain_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && s != "_"
}
