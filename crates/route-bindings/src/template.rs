//! Template substitution: canonical placeholder values → URL path.

use std::collections::BTreeMap;

use route_bindings_core::{RouteDefinition, Segment};

use crate::error::{ResolveError, Result};

/// Substitute `values` into the definition's URL template.
///
/// Placeholders are replaced in template order; values are used verbatim
/// (path values are expected to already be URL-safe tokens). An unbound
/// optional placeholder renders empty. When the template has placeholders,
/// trailing slashes contributed by the template (a literal tail, or the
/// separator before an empty optional segment) are stripped; slashes inside
/// a substituted value are kept, and the path is never reduced below `/`.
///
/// # Errors
///
/// Returns [`ResolveError::MissingParameter`] if a required placeholder has
/// no value; the literal `{name}` text is never emitted.
pub fn substitute(definition: &RouteDefinition, values: &BTreeMap<String, String>) -> Result<String> {
    let template = definition.template();
    let mut path = String::with_capacity(template.as_str().len());
    // End of the last substituted value; stripping never cuts into it.
    let mut value_end = 0;

    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => path.push_str(text),
            Segment::Placeholder(p) => match values.get(p.name()) {
                Some(value) => {
                    path.push_str(value);
                    value_end = path.len();
                }
                None if p.is_optional() => {}
                None => {
                    return Err(ResolveError::MissingParameter {
                        route: definition.name().to_string(),
                        param: p.name().to_string(),
                    });
                }
            },
        }
    }

    if template.has_parameters() {
        let trimmed = path.trim_end_matches('/').len().max(value_end);
        if trimmed == 0 && !path.is_empty() {
            path.truncate(1);
        } else {
            path.truncate(trimmed);
        }
    }

    Ok(path)
}
