//! Per-route resolution bundle.

use route_bindings_core::{Method, RouteDefinition};

use crate::args::{normalize, RouteArgs};
use crate::error::{ResolveError, Result};
use crate::form::{apply_override, form_method_for, FormDescriptor, RouteRequest};
use crate::query::{serialize, QueryMap, QueryOptions};
use crate::registry::RouteRegistry;
use crate::template::substitute;

/// Resolution functions for one route, bound to the registry it came from.
///
/// Obtained from [`RouteRegistry::endpoint`] or from generated bindings.
/// Cheap to copy; every call is independent.
///
/// ```
/// use route_bindings::{Method, QueryOptions, RouteDefinition, RouteRegistry};
///
/// let registry = RouteRegistry::builder()
///     .route(RouteDefinition::new("roles.crear", &[Method::Post], "/roles/{role}/crear").unwrap())
///     .build()
///     .unwrap();
/// let crear = registry.endpoint("roles.crear").unwrap();
///
/// assert_eq!(crear.url(7, &QueryOptions::new()).unwrap(), "/roles/7/crear");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'r> {
    registry: &'r RouteRegistry,
    definition: &'r RouteDefinition,
}

impl<'r> Endpoint<'r> {
    pub(crate) const fn new(registry: &'r RouteRegistry, definition: &'r RouteDefinition) -> Self {
        Self {
            registry,
            definition,
        }
    }

    /// The route's registry entry.
    #[must_use]
    pub const fn definition(&self) -> &'r RouteDefinition {
        self.definition
    }

    /// The route identifier.
    #[must_use]
    pub fn name(&self) -> &'r str {
        self.definition.name()
    }

    /// Resolve the URL (path plus query string).
    ///
    /// # Errors
    ///
    /// Any argument error from normalization or substitution.
    pub fn url(&self, args: impl Into<RouteArgs>, options: &QueryOptions) -> Result<String> {
        self.resolve(&args.into(), &options.resolve())
    }

    /// Resolve the URL with the route's primary (first declared) method.
    ///
    /// # Errors
    ///
    /// Same as [`url`](Self::url).
    pub fn request(
        &self,
        args: impl Into<RouteArgs>,
        options: &QueryOptions,
    ) -> Result<RouteRequest> {
        self.request_as(self.definition.primary_method(), args, options)
    }

    /// Resolve the URL for a specific declared method.
    ///
    /// # Errors
    ///
    /// [`ResolveError::MethodNotAllowed`] if the route does not declare
    /// `method`, otherwise the same as [`url`](Self::url).
    pub fn request_as(
        &self,
        method: Method,
        args: impl Into<RouteArgs>,
        options: &QueryOptions,
    ) -> Result<RouteRequest> {
        self.check_allows(method)?;
        let url = self.url(args, options)?;
        Ok(RouteRequest { url, method })
    }

    /// [`request_as`](Self::request_as) with `GET`.
    ///
    /// # Errors
    ///
    /// See [`request_as`](Self::request_as).
    pub fn get(&self, args: impl Into<RouteArgs>, options: &QueryOptions) -> Result<RouteRequest> {
        self.request_as(Method::Get, args, options)
    }

    /// [`request_as`](Self::request_as) with `HEAD`.
    ///
    /// # Errors
    ///
    /// See [`request_as`](Self::request_as).
    pub fn head(&self, args: impl Into<RouteArgs>, options: &QueryOptions) -> Result<RouteRequest> {
        self.request_as(Method::Head, args, options)
    }

    /// [`request_as`](Self::request_as) with `POST`.
    ///
    /// # Errors
    ///
    /// See [`request_as`](Self::request_as).
    pub fn post(&self, args: impl Into<RouteArgs>, options: &QueryOptions) -> Result<RouteRequest> {
        self.request_as(Method::Post, args, options)
    }

    /// [`request_as`](Self::request_as) with `PUT`.
    ///
    /// # Errors
    ///
    /// See [`request_as`](Self::request_as).
    pub fn put(&self, args: impl Into<RouteArgs>, options: &QueryOptions) -> Result<RouteRequest> {
        self.request_as(Method::Put, args, options)
    }

    /// [`request_as`](Self::request_as) with `PATCH`.
    ///
    /// # Errors
    ///
    /// See [`request_as`](Self::request_as).
    pub fn patch(&self, args: impl Into<RouteArgs>, options: &QueryOptions) -> Result<RouteRequest> {
        self.request_as(Method::Patch, args, options)
    }

    /// [`request_as`](Self::request_as) with `DELETE`.
    ///
    /// # Errors
    ///
    /// See [`request_as`](Self::request_as).
    pub fn delete(
        &self,
        args: impl Into<RouteArgs>,
        options: &QueryOptions,
    ) -> Result<RouteRequest> {
        self.request_as(Method::Delete, args, options)
    }

    /// Form descriptor for the route's primary method.
    ///
    /// # Errors
    ///
    /// Same as [`url`](Self::url).
    pub fn form(
        &self,
        args: impl Into<RouteArgs>,
        options: &QueryOptions,
    ) -> Result<FormDescriptor> {
        self.form_as(self.definition.primary_method(), args, options)
    }

    /// Form descriptor for a declared method, spoofing it through the
    /// override parameter when a form cannot submit it natively.
    ///
    /// # Errors
    ///
    /// Same as [`request_as`](Self::request_as).
    pub fn form_as(
        &self,
        method: Method,
        args: impl Into<RouteArgs>,
        options: &QueryOptions,
    ) -> Result<FormDescriptor> {
        self.check_allows(method)?;
        let mut query = options.resolve();
        apply_override(&mut query, method, self.registry.override_param());
        let action = self.resolve(&args.into(), &query)?;
        Ok(FormDescriptor {
            action,
            method: form_method_for(method),
        })
    }

    fn check_allows(&self, method: Method) -> Result<()> {
        if self.definition.allows(method) {
            Ok(())
        } else {
            Err(ResolveError::MethodNotAllowed {
                route: self.definition.name().to_string(),
                method,
            })
        }
    }

    fn resolve(&self, args: &RouteArgs, query: &QueryMap) -> Result<String> {
        let values = normalize(self.definition, args, self.registry.url_defaults())?;
        let mut url = substitute(self.definition, &values)?;
        url.push_str(&serialize(query, self.registry.array_format()));
        tracing::debug!(route = self.definition.name(), %url, "resolved route");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormMethod;
    use crate::query::QueryValue;
    use pretty_assertions::assert_eq;
    use route_bindings_core::Scalar;

    fn registry() -> RouteRegistry {
        RouteRegistry::builder()
            .route(RouteDefinition::new("stock.imprimir", &[Method::Get], "/stock/imprimir").unwrap())
            .route(
                RouteDefinition::new("posts.update", &[Method::Put, Method::Patch], "/posts/{post}")
                    .unwrap(),
            )
            .route(
                RouteDefinition::new("posts.index", &[Method::Get], "/{locale}/posts").unwrap(),
            )
            .url_default("locale", "en")
            .build()
            .unwrap()
    }

    #[test]
    fn request_uses_primary_method() {
        let registry = registry();
        let update = registry.endpoint("posts.update").unwrap();
        let req = update.request(3, &QueryOptions::new()).unwrap();
        assert_eq!(
            req,
            RouteRequest {
                url: "/posts/3".to_string(),
                method: Method::Put
            }
        );
    }

    #[test]
    fn sugar_methods_check_declared_methods() {
        let registry = registry();
        let update = registry.endpoint("posts.update").unwrap();
        let none = QueryOptions::new();

        assert_eq!(update.patch(3, &none).unwrap().method, Method::Patch);
        assert_eq!(
            update.delete(3, &none).unwrap_err(),
            ResolveError::MethodNotAllowed {
                route: "posts.update".to_string(),
                method: Method::Delete,
            }
        );
        assert!(update.get(3, &none).is_err());
    }

    #[test]
    fn head_implied_by_get() {
        let registry = registry();
        let stock = registry.endpoint("stock.imprimir").unwrap();
        let req = stock.head((), &QueryOptions::new()).unwrap();
        assert_eq!(req.url, "/stock/imprimir");
        assert_eq!(req.method, Method::Head);
    }

    #[test]
    fn body_method_form_forced_to_get() {
        let registry = registry();
        let update = registry.endpoint("posts.update").unwrap();
        let form = update
            .form_as(Method::Patch, 3, &QueryOptions::replace([("draft", true)]))
            .unwrap();
        assert_eq!(
            form,
            FormDescriptor {
                action: "/posts/3?_method=PATCH&draft=1".to_string(),
                method: FormMethod::Get,
            }
        );
    }

    #[test]
    fn override_survives_merge_and_caller_key() {
        let registry = registry();
        let update = registry.endpoint("posts.update").unwrap();
        let options = QueryOptions::merge([("_method", QueryValue::from("GET"))])
            .with_context(QueryMap::from([("page", 2)]));
        let form = update.form(3, &options).unwrap();
        assert_eq!(form.action, "/posts/3?_method=PUT&page=2");
    }

    #[test]
    fn global_default_fills_placeholder() {
        let registry = registry();
        let index = registry.endpoint("posts.index").unwrap();
        let none = QueryOptions::new();
        assert_eq!(index.url((), &none).unwrap(), "/en/posts");
        assert_eq!(index.url("es", &none).unwrap(), "/es/posts");
    }

    #[test]
    fn errors_surface_before_any_url() {
        let registry = registry();
        let update = registry.endpoint("posts.update").unwrap();
        let err = update.url((), &QueryOptions::new()).unwrap_err();
        assert!(matches!(err, ResolveError::MissingParameter { .. }));

        let entity = crate::args::RouteArg::entity([("slug", Scalar::from("x"))]);
        let err = update.url(entity, &QueryOptions::new()).unwrap_err();
        assert!(matches!(err, ResolveError::MalformedArgument { .. }));
    }
}
