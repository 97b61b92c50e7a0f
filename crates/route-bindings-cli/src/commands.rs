//! Resolution and listing operations behind the CLI subcommands.

use route_bindings::{
    FormDescriptor, Method, QueryMap, QueryOptions, RouteArgs, RouteRegistry, RouteRequest,
};
use serde_json::Value;

use crate::error::{Error, Result};

/// One `url` / `form` invocation: a route plus JSON-encoded inputs.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput<'a> {
    /// Route identifier.
    pub route: &'a str,
    /// Route arguments as JSON (scalar, array, or object).
    pub args: Option<&'a str>,
    /// Replacing query as a JSON object.
    pub query: Option<&'a str>,
    /// Merging query as a JSON object.
    pub merge_query: Option<&'a str>,
    /// Query parameters of the current page, as a raw query string.
    pub context: Option<&'a str>,
    /// Method to resolve for; the route's primary method when `None`.
    pub method: Option<Method>,
}

impl ResolveInput<'_> {
    fn route_args(&self) -> Result<RouteArgs> {
        let Some(raw) = self.args else {
            return Ok(RouteArgs::None);
        };
        let value = parse_json("--args", raw)?;
        Ok(RouteArgs::try_from(value)?)
    }

    fn query_options(&self) -> Result<QueryOptions> {
        let mut options = QueryOptions::new();
        if let Some(raw) = self.context {
            options = options.with_context(route_bindings::decode(raw));
        }
        if let Some(raw) = self.query {
            options = options.with_query(parse_query_map("--query", raw)?);
        }
        if let Some(raw) = self.merge_query {
            options = options.with_merge_query(parse_query_map("--merge-query", raw)?);
        }
        Ok(options)
    }
}

fn parse_json(flag: &'static str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|source| Error::Json { flag, source })
}

fn parse_query_map(flag: &'static str, raw: &str) -> Result<QueryMap> {
    QueryMap::from_json(parse_json(flag, raw)?).ok_or(Error::NotAnObject { flag })
}

/// Resolve a route to its `{url, method}` descriptor.
///
/// # Errors
///
/// Returns an error for unknown routes, undeclared methods, malformed JSON,
/// or arguments that do not fit the route.
pub fn resolve_request(registry: &RouteRegistry, input: &ResolveInput<'_>) -> Result<RouteRequest> {
    let endpoint = registry.try_endpoint(input.route)?;
    let method = input
        .method
        .unwrap_or_else(|| endpoint.definition().primary_method());
    Ok(endpoint.request_as(method, input.route_args()?, &input.query_options()?)?)
}

/// Resolve a route to an HTML form `{action, method}` descriptor.
///
/// # Errors
///
/// Same as [`resolve_request`].
pub fn resolve_form(registry: &RouteRegistry, input: &ResolveInput<'_>) -> Result<FormDescriptor> {
    let endpoint = registry.try_endpoint(input.route)?;
    let method = input
        .method
        .unwrap_or_else(|| endpoint.definition().primary_method());
    Ok(endpoint.form_as(method, input.route_args()?, &input.query_options()?)?)
}

/// Render the route table as aligned text: name, methods, template, source.
#[must_use]
pub fn list_routes(registry: &RouteRegistry) -> String {
    let rows: Vec<[String; 4]> = registry
        .iter()
        .map(|def| {
            [
                def.name().to_string(),
                def.methods()
                    .iter()
                    .map(|m| m.as_upper())
                    .collect::<Vec<_>>()
                    .join("|"),
                def.url().to_string(),
                def.source().map(ToString::to_string).unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths = [0usize; 3];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for [name, methods, url, source] in &rows {
        let line = format!(
            "{name:<w0$}  {methods:<w1$}  {url:<w2$}  {source}",
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use route_bindings::{FormMethod, RouteManifest};

    fn registry() -> RouteRegistry {
        let manifest = RouteManifest::from_json_str(
            r#"{
                "routes": [
                    {
                        "name": "roles.crear-funcionalidad",
                        "methods": ["post"],
                        "url": "/roles/{role}/crear-funcionalidad",
                        "source": { "file": "RoleController.php", "line": 42 }
                    },
                    { "name": "stock.imprimir", "methods": ["get"], "url": "/stock/imprimir" }
                ]
            }"#,
        )
        .unwrap();
        RouteRegistry::from_manifest(&manifest).unwrap()
    }

    fn input(route: &str) -> ResolveInput<'_> {
        ResolveInput {
            route,
            ..ResolveInput::default()
        }
    }

    #[test]
    fn request_with_scalar_and_object_args() {
        let registry = registry();
        for args in ["7", r#"{"id": 7}"#, r#"{"role": 7}"#, "[7]"] {
            let req = resolve_request(
                &registry,
                &ResolveInput {
                    args: Some(args),
                    ..input("roles.crear-funcionalidad")
                },
            )
            .unwrap();
            assert_eq!(req.url, "/roles/7/crear-funcionalidad", "{args}");
            assert_eq!(req.method, Method::Post);
        }
    }

    #[test]
    fn request_with_query_and_context() {
        let registry = registry();
        let req = resolve_request(
            &registry,
            &ResolveInput {
                context: Some("?a=1"),
                merge_query: Some(r#"{"b": 2, "tags": ["x", "y"]}"#),
                ..input("stock.imprimir")
            },
        )
        .unwrap();
        assert_eq!(req.url, "/stock/imprimir?a=1&b=2&tags[]=x&tags[]=y");
    }

    #[test]
    fn head_form_uses_override() {
        let registry = registry();
        let form = resolve_form(
            &registry,
            &ResolveInput {
                method: Some(Method::Head),
                ..input("stock.imprimir")
            },
        )
        .unwrap();
        assert_eq!(form.action, "/stock/imprimir?_method=HEAD");
        assert_eq!(form.method, FormMethod::Get);
    }

    #[test]
    fn errors_are_typed() {
        let registry = registry();

        let err = resolve_request(&registry, &input("nope")).unwrap_err();
        assert!(matches!(err, Error::Resolve(_)));

        let err = resolve_request(
            &registry,
            &ResolveInput {
                args: Some("{"),
                ..input("roles.crear-funcionalidad")
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Json { flag: "--args", .. }));

        let err = resolve_request(
            &registry,
            &ResolveInput {
                query: Some("[1]"),
                ..input("stock.imprimir")
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotAnObject { flag: "--query" }));

        let err = resolve_request(
            &registry,
            &ResolveInput {
                method: Some(Method::Delete),
                ..input("stock.imprimir")
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not accept method 'delete'"));
    }

    #[test]
    fn list_is_aligned() {
        let listing = list_routes(&registry());
        assert_eq!(
            listing,
            "roles.crear-funcionalidad  POST      /roles/{role}/crear-funcionalidad  RoleController.php:42\n\
             stock.imprimir             GET|HEAD  /stock/imprimir\n"
        );
    }
}
