//! Resolution errors.
//!
//! Every failure is synchronous and local to one resolution call: the call
//! either produces a complete URL or one of these errors, never a partial
//! URL. Callers should treat them as invalid call sites, not transient
//! conditions.

use route_bindings_core::Method;

/// Errors produced while resolving a route to a URL or form descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// A required placeholder has no argument and no default.
    #[error("missing required route parameter '{param}' for route '{route}'")]
    MissingParameter {
        /// The route identifier.
        route: String,
        /// The unbound placeholder.
        param: String,
    },

    /// An entity argument lacks the field its placeholder binds through,
    /// or an argument has a shape that cannot be bound at all.
    #[error("malformed argument for '{param}' on route '{route}': {reason}")]
    MalformedArgument {
        /// The route identifier.
        route: String,
        /// The placeholder the argument was bound to.
        param: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A dynamic (JSON) value has a shape that can never be a route argument.
    #[error("cannot use {found} as a route argument")]
    UnsupportedArgument {
        /// Kind of value that was supplied (e.g., `"a nested array"`).
        found: &'static str,
    },

    /// An optional placeholder is missing while a later optional one is bound.
    ///
    /// Optional placeholders may only be omitted from the end of the template.
    #[error(
        "optional parameter '{param}' of route '{route}' is missing while a later \
         optional parameter is set; unable to generate a URL"
    )]
    OptionalParameterGap {
        /// The route identifier.
        route: String,
        /// The first missing optional placeholder.
        param: String,
    },

    /// The route does not accept the requested method.
    #[error("route '{route}' does not accept method '{method}'")]
    MethodNotAllowed {
        /// The route identifier.
        route: String,
        /// The requested method.
        method: Method,
    },

    /// No route with this identifier is registered.
    #[error("route '{name}' is not registered")]
    UnknownRoute {
        /// The requested identifier.
        name: String,
    },
}

/// Convenience alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time assertion that `ResolveError` is `Send + Sync`.
    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResolveError>();
    };

    #[test]
    fn missing_parameter_display() {
        let err = ResolveError::MissingParameter {
            route: "roles.show".to_string(),
            param: "role".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "missing required route parameter 'role' for route 'roles.show'"
        );
    }

    #[test]
    fn method_not_allowed_display() {
        let err = ResolveError::MethodNotAllowed {
            route: "stock.imprimir".to_string(),
            method: Method::Delete,
        };
        assert_eq!(
            err.to_string(),
            "route 'stock.imprimir' does not accept method 'delete'"
        );
    }

    #[test]
    fn is_std_error() {
        let err = ResolveError::UnknownRoute {
            name: "nope".to_string(),
        };
        let _: &dyn std::error::Error = &err;
    }
}
