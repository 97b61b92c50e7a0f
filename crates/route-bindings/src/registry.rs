//! Read-only route registry.

use std::collections::{BTreeMap, HashMap};

use route_bindings_core::{ManifestError, RouteDefinition, RouteManifest, Scalar};

use crate::endpoint::Endpoint;
use crate::error::{ResolveError, Result};
use crate::form::DEFAULT_OVERRIDE_PARAM;
use crate::query::ArrayFormat;

/// The client's copy of the server route table.
///
/// Built once (typically in a `static LazyLock` by generated bindings) and
/// never mutated afterwards, so it can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    routes: Vec<RouteDefinition>,
    index: HashMap<String, usize>,
    url_defaults: BTreeMap<String, Scalar>,
    override_param: String,
    array_format: ArrayFormat,
}

impl RouteRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> RouteRegistryBuilder {
        RouteRegistryBuilder::default()
    }

    /// Build a registry from a parsed manifest, including its global
    /// URL defaults.
    ///
    /// # Errors
    ///
    /// Any validation error from [`RouteManifest::definitions`].
    pub fn from_manifest(manifest: &RouteManifest) -> std::result::Result<Self, ManifestError> {
        let builder = manifest
            .defaults
            .iter()
            .fold(Self::builder(), |b, (name, value)| {
                b.url_default(name.clone(), value.clone())
            });
        manifest
            .definitions()?
            .into_iter()
            .fold(builder, RouteRegistryBuilder::route)
            .build()
    }

    /// Look up a route definition by identifier.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.index.get(name).map(|&i| &self.routes[i])
    }

    /// Resolution functions for a route.
    #[must_use]
    pub fn endpoint(&self, name: &str) -> Option<Endpoint<'_>> {
        self.get(name).map(|def| Endpoint::new(self, def))
    }

    /// Like [`endpoint`](Self::endpoint), failing for unknown identifiers.
    ///
    /// # Errors
    ///
    /// [`ResolveError::UnknownRoute`] if no route has this identifier.
    pub fn try_endpoint(&self, name: &str) -> Result<Endpoint<'_>> {
        self.endpoint(name).ok_or_else(|| ResolveError::UnknownRoute {
            name: name.to_string(),
        })
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter()
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the registry has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registry-wide placeholder defaults.
    #[must_use]
    pub const fn url_defaults(&self) -> &BTreeMap<String, Scalar> {
        &self.url_defaults
    }

    /// Name of the form method-override query parameter.
    #[must_use]
    pub fn override_param(&self) -> &str {
        &self.override_param
    }

    /// Array keying used in query strings.
    #[must_use]
    pub const fn array_format(&self) -> ArrayFormat {
        self.array_format
    }
}

impl<'a> IntoIterator for &'a RouteRegistry {
    type Item = &'a RouteDefinition;
    type IntoIter = std::slice::Iter<'a, RouteDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

/// Builder for [`RouteRegistry`].
#[derive(Debug, Clone)]
pub struct RouteRegistryBuilder {
    routes: Vec<RouteDefinition>,
    url_defaults: BTreeMap<String, Scalar>,
    override_param: String,
    array_format: ArrayFormat,
}

impl Default for RouteRegistryBuilder {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            url_defaults: BTreeMap::new(),
            override_param: DEFAULT_OVERRIDE_PARAM.to_string(),
            array_format: ArrayFormat::default(),
        }
    }
}

impl RouteRegistryBuilder {
    /// Add a route.
    #[must_use]
    pub fn route(mut self, definition: RouteDefinition) -> Self {
        self.routes.push(definition);
        self
    }

    /// Set a registry-wide default for placeholders named `name`.
    ///
    /// Route-level defaults and caller arguments take precedence.
    #[must_use]
    pub fn url_default(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.url_defaults.insert(name.into(), value.into());
        self
    }

    /// Override the method-override parameter name (default: `_method`).
    #[must_use]
    pub fn override_param(mut self, name: impl Into<String>) -> Self {
        self.override_param = name.into();
        self
    }

    /// Set the array keying used in query strings (default: brackets).
    #[must_use]
    pub const fn array_format(mut self, format: ArrayFormat) -> Self {
        self.array_format = format;
        self
    }

    /// Finish the registry.
    ///
    /// # Errors
    ///
    /// [`ManifestError::DuplicateRoute`] if two routes share an identifier.
    pub fn build(self) -> std::result::Result<RouteRegistry, ManifestError> {
        let mut index = HashMap::with_capacity(self.routes.len());
        for (i, def) in self.routes.iter().enumerate() {
            if index.insert(def.name().to_string(), i).is_some() {
                return Err(ManifestError::DuplicateRoute {
                    route: def.name().to_string(),
                });
            }
        }

        tracing::debug!(
            routes = self.routes.len(),
            defaults = self.url_defaults.len(),
            "route registry built"
        );

        Ok(RouteRegistry {
            routes: self.routes,
            index,
            url_defaults: self.url_defaults,
            override_param: self.override_param,
            array_format: self.array_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_bindings_core::Method;

    /// Compile-time assertion that the registry can live in a `static`.
    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RouteRegistry>();
        assert_send_sync::<Endpoint<'static>>();
    };

    fn def(name: &str, url: &str) -> RouteDefinition {
        RouteDefinition::new(name, &[Method::Get], url).unwrap()
    }

    #[test]
    fn lookups() {
        let registry = RouteRegistry::builder()
            .route(def("a", "/a"))
            .route(def("b", "/b"))
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert_eq!(registry.get("b").unwrap().url(), "/b");
        assert!(registry.get("c").is_none());
        assert_eq!(
            registry.iter().map(RouteDefinition::name).collect::<Vec<_>>(),
            ["a", "b"]
        );
        assert_eq!(registry.override_param(), "_method");
        assert_eq!(registry.array_format(), ArrayFormat::Brackets);
    }

    #[test]
    fn try_endpoint_unknown() {
        let registry = RouteRegistry::builder().build().unwrap();
        assert!(registry.is_empty());
        assert_eq!(
            registry.try_endpoint("nope").unwrap_err(),
            ResolveError::UnknownRoute {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = RouteRegistry::builder()
            .route(def("a", "/a"))
            .route(def("a", "/other"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateRoute { ref route } if route == "a"));
    }

    #[test]
    fn from_manifest_carries_defaults() {
        let manifest = RouteManifest::from_json_str(
            r#"{
                "defaults": { "locale": "en" },
                "routes": [
                    { "name": "home", "methods": ["get"], "url": "/{locale}" }
                ]
            }"#,
        )
        .unwrap();
        let registry = RouteRegistry::from_manifest(&manifest).unwrap();
        assert_eq!(registry.url_defaults().get("locale"), Some(&Scalar::from("en")));
        assert_eq!(
            registry.get("home").unwrap().methods(),
            &[Method::Get, Method::Head]
        );
    }

    #[test]
    fn custom_override_and_array_format() {
        let registry = RouteRegistry::builder()
            .override_param("_verb")
            .array_format(ArrayFormat::Indices)
            .build()
            .unwrap();
        assert_eq!(registry.override_param(), "_verb");
        assert_eq!(registry.array_format(), ArrayFormat::Indices);
    }
}
