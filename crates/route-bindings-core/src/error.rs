//! Typed errors for route table construction.

/// A route template could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// A `{` without a matching `}`.
    #[error("unclosed '{{' at byte {position} in template '{template}'")]
    UnclosedBrace {
        /// The raw template.
        template: String,
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A `}` without a preceding `{`.
    #[error("unexpected '}}' at byte {position} in template '{template}'")]
    UnexpectedCloseBrace {
        /// The raw template.
        template: String,
        /// Byte offset of the closing brace.
        position: usize,
    },

    /// A placeholder whose name is empty or contains `{` or `/`.
    #[error("invalid placeholder '{{{placeholder}}}' in template '{template}'")]
    InvalidPlaceholder {
        /// The raw template.
        template: String,
        /// The placeholder text between the braces.
        placeholder: String,
    },

    /// The same placeholder name appears twice.
    #[error("placeholder '{name}' appears more than once in template '{template}'")]
    DuplicatePlaceholder {
        /// The raw template.
        template: String,
        /// The repeated name.
        name: String,
    },
}

/// Errors produced while loading or validating a route manifest.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ManifestError {
    /// File I/O failure (reading the manifest).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("failed to parse JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("failed to parse YAML manifest: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A route's URL template is malformed.
    #[error("route '{route}' has an invalid URL template: {source}")]
    InvalidTemplate {
        /// The route identifier.
        route: String,
        /// The underlying template error.
        source: TemplateError,
    },

    /// A route declares no HTTP methods.
    #[error("route '{route}' declares no HTTP methods")]
    NoMethods {
        /// The route identifier.
        route: String,
    },

    /// A default value names a placeholder the template does not have.
    #[error("route '{route}' has a default for '{param}', which is not a placeholder of its URL")]
    UnknownDefault {
        /// The route identifier.
        route: String,
        /// The unknown parameter name.
        param: String,
    },

    /// Two routes share the same identifier.
    #[error("route '{route}' is declared more than once")]
    DuplicateRoute {
        /// The repeated route identifier.
        route: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ManifestError>();
        assert_send_sync::<TemplateError>();
    };

    #[test]
    fn template_error_display() {
        let err = TemplateError::UnclosedBrace {
            template: "/roles/{role".to_string(),
            position: 7,
        };
        assert_eq!(
            err.to_string(),
            "unclosed '{' at byte 7 in template '/roles/{role'"
        );

        let err = TemplateError::InvalidPlaceholder {
            template: "/a/{}".to_string(),
            placeholder: String::new(),
        };
        assert_eq!(err.to_string(), "invalid placeholder '{}' in template '/a/{}'");
    }

    #[test]
    fn manifest_error_wraps_template_error() {
        let err = ManifestError::InvalidTemplate {
            route: "roles.show".to_string(),
            source: TemplateError::DuplicatePlaceholder {
                template: "/{a}/{a}".to_string(),
                name: "a".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("roles.show"), "missing route: {msg}");
        assert!(msg.contains("more than once"), "missing cause: {msg}");
    }
}
