//! Typed error enum for the `route-bindings-cli` library API.
//!
//! The binary (`main.rs`) converts these to `anyhow::Error` at the process
//! boundary for richer context messages.

use route_bindings::{ManifestError, ResolveError};
use route_bindings_build::GenerateError;

/// Errors produced by `route-bindings-cli` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading config files).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML config parsing failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// TOML config parsing failure.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// A JSON argument (`--args`, `--query`, ...) is not valid JSON.
    #[error("invalid JSON in {flag}: {source}")]
    Json {
        /// The flag the JSON was passed to.
        flag: &'static str,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A JSON query option is not an object.
    #[error("{flag} must be a JSON object")]
    NotAnObject {
        /// The offending flag.
        flag: &'static str,
    },

    /// The route manifest could not be loaded or validated.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A route could not be resolved with the given arguments.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Binding generation failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;
