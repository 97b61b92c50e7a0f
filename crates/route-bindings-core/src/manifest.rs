//! Route manifest — the static route table produced by the server build.
//!
//! # File format
//!
//! ```yaml
//! # routes.yaml
//! # Registry-wide URL defaults, applied after per-route defaults.
//! defaults:
//!   locale: es
//!
//! routes:
//!   - name: roles.crear-funcionalidad
//!     methods: [post]
//!     url: /roles/{role}/crear-funcionalidad
//!     source:
//!       file: app/Http/Controllers/RoleController.php
//!       line: 42
//!   - name: stock.imprimir
//!     methods: [get, head]
//!     url: /stock/imprimir
//! ```
//!
//! The same structure is accepted as JSON.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::definition::{RouteDefinition, SourceLocation};
use crate::error::ManifestError;
use crate::method::Method;
use crate::scalar::Scalar;

/// A route table as loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteManifest {
    /// Registry-wide URL defaults (placeholder name → value).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, Scalar>,

    /// Routes in declaration order.
    pub routes: Vec<ManifestRoute>,
}

/// One route as declared in a manifest, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRoute {
    /// Route identifier (e.g., `roles.crear-funcionalidad`).
    pub name: String,

    /// Accepted methods, primary method first.
    pub methods: Vec<Method>,

    /// URL template.
    pub url: String,

    /// Per-route placeholder defaults.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, Scalar>,

    /// Server-side handler location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
}

impl RouteManifest {
    /// Parse a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Json`] on malformed input.
    pub fn from_json_str(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Yaml`] on malformed input.
    pub fn from_yaml_str(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Load a manifest file; `.yaml` / `.yml` files are read as YAML,
    /// everything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Validate every route into a [`RouteDefinition`], in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure: a malformed template, an empty
    /// method list, a default for an unknown placeholder, or a repeated
    /// route name.
    pub fn definitions(&self) -> Result<Vec<RouteDefinition>, ManifestError> {
        let mut seen = HashSet::new();
        let mut definitions = Vec::with_capacity(self.routes.len());

        for route in &self.routes {
            if !seen.insert(route.name.as_str()) {
                return Err(ManifestError::DuplicateRoute {
                    route: route.name.clone(),
                });
            }
            definitions.push(route.to_definition()?);
        }

        Ok(definitions)
    }
}

impl ManifestRoute {
    /// Validate this entry into a [`RouteDefinition`].
    ///
    /// # Errors
    ///
    /// See [`RouteDefinition::new`] and [`RouteDefinition::with_default`].
    pub fn to_definition(&self) -> Result<RouteDefinition, ManifestError> {
        let mut def = RouteDefinition::new(&self.name, &self.methods, &self.url)?;
        for (param, value) in &self.defaults {
            def = def.with_default(param, value.clone())?;
        }
        if let Some(source) = &self.source {
            def = def.with_source(source.clone());
        }
        Ok(def)
    }
}
