//! URL templates with named placeholders.
//!
//! Syntax:
//!
//! | Token            | Meaning                                               |
//! |------------------|-------------------------------------------------------|
//! | `{role}`         | required placeholder, entities bind through `id`      |
//! | `{role?}`        | optional placeholder, renders empty when absent       |
//! | `{role:slug}`    | required placeholder, entities bind through `slug`    |
//! | `{role:slug?}`   | optional placeholder with a binding field             |

use std::fmt;

use crate::error::TemplateError;

/// Field read from an entity argument when a placeholder declares none.
pub const DEFAULT_BINDING_FIELD: &str = "id";

/// A named slot in a [`RouteTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    name: String,
    binding_field: Option<String>,
    optional: bool,
}

impl Placeholder {
    /// The placeholder name (`role` for `{role:slug?}`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entity field this placeholder binds through (`id` unless declared).
    #[must_use]
    pub fn binding_field(&self) -> &str {
        self.binding_field.as_deref().unwrap_or(DEFAULT_BINDING_FIELD)
    }

    /// Whether the placeholder may be left unbound.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text copied into the URL as-is.
    Literal(String),
    /// A placeholder substituted at resolution time.
    Placeholder(Placeholder),
}

/// A parsed URL template such as `/roles/{role}/crear-funcionalidad`.
///
/// # Examples
///
/// ```
/// use route_bindings_core::RouteTemplate;
///
/// let template = RouteTemplate::parse("/posts/{post:slug}/comments/{page?}").unwrap();
/// let names: Vec<_> = template.parameters().map(|p| p.name()).collect();
/// assert_eq!(names, ["post", "page"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl RouteTemplate {
    /// Parse a template string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] for unbalanced braces, empty or malformed
    /// placeholder names, and repeated placeholder names.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;
        let mut offset = 0;

        while let Some(start) = rest.find(['{', '}']) {
            if rest.as_bytes()[start] == b'}' {
                return Err(TemplateError::UnexpectedCloseBrace {
                    template: raw.to_string(),
                    position: offset + start,
                });
            }
            literal.push_str(&rest[..start]);

            let Some(len) = rest[start..].find('}') else {
                return Err(TemplateError::UnclosedBrace {
                    template: raw.to_string(),
                    position: offset + start,
                });
            };
            let inner = &rest[start + 1..start + len];
            let placeholder = parse_placeholder(raw, inner)?;

            let duplicate = segments.iter().any(|s| {
                matches!(s, Segment::Placeholder(p) if p.name == placeholder.name)
            });
            if duplicate {
                return Err(TemplateError::DuplicatePlaceholder {
                    template: raw.to_string(),
                    name: placeholder.name,
                });
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(placeholder));

            offset += start + len + 1;
            rest = &rest[start + len + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The template exactly as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments in template order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholders in encountered order.
    pub fn parameters(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(p) => Some(p),
            Segment::Literal(_) => None,
        })
    }

    /// Look up a placeholder by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Placeholder> {
        self.parameters().find(|p| p.name == name)
    }

    /// Whether the template has any placeholder at all.
    #[must_use]
    pub fn has_parameters(&self) -> bool {
        self.parameters().next().is_some()
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse the text between braces: `name`, `name?`, `name:field`, `name:field?`.
fn parse_placeholder(template: &str, inner: &str) -> Result<Placeholder, TemplateError> {
    let invalid = || TemplateError::InvalidPlaceholder {
        template: template.to_string(),
        placeholder: inner.to_string(),
    };

    let (body, optional) = match inner.strip_suffix('?') {
        Some(body) => (body, true),
        None => (inner, false),
    };
    let (name, binding_field) = match body.split_once(':') {
        Some((name, field)) => (name, Some(field)),
        None => (body, None),
    };

    let valid = |s: &str| !s.is_empty() && !s.contains(['{', '/', ':', '?']);
    if !valid(name) || binding_field.is_some_and(|f| !valid(f)) {
        return Err(invalid());
    }

    Ok(Placeholder {
        name: name.to_string(),
        binding_field: binding_field.map(ToString::to_string),
        optional,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(template: &RouteTemplate) -> Vec<&str> {
        template.parameters().map(Placeholder::name).collect()
    }

    #[test]
    fn parse_no_placeholders() {
        let t = RouteTemplate::parse("/stock/imprimir").unwrap();
        assert!(!t.has_parameters());
        assert_eq!(
            t.segments(),
            &[Segment::Literal("/stock/imprimir".to_string())]
        );
    }

    #[test]
    fn parse_single_placeholder() {
        let t = RouteTemplate::parse("/roles/{role}/crear-funcionalidad").unwrap();
        assert_eq!(names(&t), vec!["role"]);
        assert_eq!(t.segments().len(), 3);
        let role = t.parameter("role").unwrap();
        assert_eq!(role.binding_field(), "id");
        assert!(!role.is_optional());
    }

    #[test]
    fn parse_binding_field_and_optional() {
        let t = RouteTemplate::parse("/posts/{post:slug}/{page?}/{tag:name?}").unwrap();
        assert_eq!(names(&t), vec!["post", "page", "tag"]);

        let post = t.parameter("post").unwrap();
        assert_eq!(post.binding_field(), "slug");
        assert!(!post.is_optional());

        let page = t.parameter("page").unwrap();
        assert_eq!(page.binding_field(), "id");
        assert!(page.is_optional());

        let tag = t.parameter("tag").unwrap();
        assert_eq!(tag.binding_field(), "name");
        assert!(tag.is_optional());
    }

    #[test]
    fn adjacent_placeholders() {
        let t = RouteTemplate::parse("{a}{b}").unwrap();
        assert_eq!(names(&t), vec!["a", "b"]);
        assert_eq!(t.segments().len(), 2);
    }

    #[test]
    fn display_returns_raw() {
        let raw = "/users/{user}/edit/";
        assert_eq!(RouteTemplate::parse(raw).unwrap().to_string(), raw);
    }

    #[test]
    fn unclosed_brace_errors() {
        let err = RouteTemplate::parse("/roles/{role").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnclosedBrace {
                template: "/roles/{role".to_string(),
                position: 7,
            }
        );
    }

    #[test]
    fn stray_close_brace_errors() {
        let err = RouteTemplate::parse("/roles/role}").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::UnexpectedCloseBrace { position: 11, .. }
        ));
    }

    #[test]
    fn empty_or_malformed_placeholder_errors() {
        for raw in ["/a/{}", "/a/{?}", "/a/{:id}", "/a/{b:}", "/a/{b/c}", "/a/{{b}}"] {
            let err = RouteTemplate::parse(raw).unwrap_err();
            assert!(
                matches!(err, TemplateError::InvalidPlaceholder { .. }),
                "{raw}: {err:?}"
            );
        }
    }

    #[test]
    fn duplicate_placeholder_errors() {
        let err = RouteTemplate::parse("/{id}/x/{id?}").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::DuplicatePlaceholder { ref name, .. } if name == "id"
        ));
    }
}
