//! Immutable per-endpoint route definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, TemplateError};
use crate::method::Method;
use crate::scalar::Scalar;
use crate::template::RouteTemplate;

/// Where the server-side handler of a route lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file of the handler (e.g., `app/Http/Controllers/RoleController.php`).
    pub file: String,
    /// 1-based line number, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.file),
            None => f.write_str(&self.file),
        }
    }
}

/// A registry entry: the methods, URL template and defaults of one endpoint.
///
/// Created once when the route table is loaded and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use route_bindings_core::{Method, RouteDefinition};
///
/// let def = RouteDefinition::new("stock.imprimir", &[Method::Get], "/stock/imprimir").unwrap();
/// // HEAD is implied by GET
/// assert_eq!(def.methods(), &[Method::Get, Method::Head]);
/// assert_eq!(def.primary_method(), Method::Get);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDefinition {
    name: String,
    methods: Vec<Method>,
    template: RouteTemplate,
    defaults: BTreeMap<String, Scalar>,
    source: Option<SourceLocation>,
}

impl RouteDefinition {
    /// Define a route.
    ///
    /// Methods are de-duplicated keeping their first position, and `HEAD` is
    /// inserted right after `GET` when `GET` is declared without it.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NoMethods`] for an empty method list and
    /// [`ManifestError::InvalidTemplate`] when `url` does not parse.
    pub fn new(name: &str, methods: &[Method], url: &str) -> Result<Self, ManifestError> {
        let template = RouteTemplate::parse(url).map_err(|source| invalid(name, source))?;
        let methods = normalize_methods(methods);
        if methods.is_empty() {
            return Err(ManifestError::NoMethods {
                route: name.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            methods,
            template,
            defaults: BTreeMap::new(),
            source: None,
        })
    }

    /// Attach a default value for one placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnknownDefault`] if `param` is not a
    /// placeholder of this route's template.
    pub fn with_default(
        mut self,
        param: &str,
        value: impl Into<Scalar>,
    ) -> Result<Self, ManifestError> {
        if self.template.parameter(param).is_none() {
            return Err(ManifestError::UnknownDefault {
                route: self.name,
                param: param.to_string(),
            });
        }
        self.defaults.insert(param.to_string(), value.into());
        Ok(self)
    }

    /// Attach the handler's source location.
    #[must_use]
    pub fn with_source(mut self, source: SourceLocation) -> Self {
        self.source = Some(source);
        self
    }

    /// Route identifier (e.g., `roles.crear-funcionalidad`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accepted methods, primary method first.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// The method used by default calls.
    #[must_use]
    pub fn primary_method(&self) -> Method {
        self.methods[0]
    }

    /// Whether `method` is accepted by this route.
    #[must_use]
    pub fn allows(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }

    /// The parsed URL template.
    #[must_use]
    pub const fn template(&self) -> &RouteTemplate {
        &self.template
    }

    /// The raw URL template.
    #[must_use]
    pub fn url(&self) -> &str {
        self.template.as_str()
    }

    /// Per-route placeholder defaults.
    #[must_use]
    pub const fn defaults(&self) -> &BTreeMap<String, Scalar> {
        &self.defaults
    }

    /// The handler's source location, if known.
    #[must_use]
    pub const fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }
}

fn invalid(name: &str, source: TemplateError) -> ManifestError {
    ManifestError::InvalidTemplate {
        route: name.to_string(),
        source,
    }
}

fn normalize_methods(declared: &[Method]) -> Vec<Method> {
    let mut methods: Vec<Method> = Vec::with_capacity(declared.len() + 1);
    for &method in declared {
        if !methods.contains(&method) {
            methods.push(method);
        }
    }
    if !methods.contains(&Method::Head) {
        if let Some(pos) = methods.iter().position(|m| *m == Method::Get) {
            methods.insert(pos + 1, Method::Head);
        }
    }
    methods
}
