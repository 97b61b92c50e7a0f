//! Argument normalization: caller-supplied argument shapes → placeholder values.
//!
//! Callers may pass a bare value, an entity (anything exposing an `id`
//! field, or the field a placeholder binds through), a positional list, or
//! a name → value mapping. All of them normalize to the same canonical
//! `placeholder name → string` map before substitution.

use std::collections::BTreeMap;

use route_bindings_core::{Placeholder, RouteDefinition, Scalar};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ResolveError, Result};

/// One argument bound to one placeholder.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RouteArg {
    /// A bare value used as-is.
    Scalar(Scalar),
    /// A domain entity; the placeholder's binding field (usually `id`) is
    /// extracted from it.
    Entity(BTreeMap<String, Scalar>),
    /// No value; the placeholder falls back to its defaults.
    #[default]
    Absent,
}

impl RouteArg {
    /// Build an entity argument from its fields.
    ///
    /// ```
    /// use route_bindings::RouteArg;
    ///
    /// let role = RouteArg::entity([("id", 7.into()), ("slug", "admin".into())]);
    /// ```
    pub fn entity<K: Into<String>>(fields: impl IntoIterator<Item = (K, Scalar)>) -> Self {
        Self::Entity(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Convert any serializable domain value into an argument.
    ///
    /// Structs become entities (their scalar fields are kept), numbers and
    /// strings become scalars, `None` becomes [`RouteArg::Absent`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnsupportedArgument`] if the value serializes
    /// to a sequence, or fails to serialize at all.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value).map_err(|_| ResolveError::UnsupportedArgument {
            found: "an unserializable value",
        })?;
        Self::try_from(json)
    }
}

macro_rules! route_arg_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RouteArg {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::from(value))
                }
            }

            impl From<Option<$ty>> for RouteArg {
                fn from(value: Option<$ty>) -> Self {
                    value.map_or(Self::Absent, Self::from)
                }
            }

            impl From<$ty> for RouteArgs {
                fn from(value: $ty) -> Self {
                    Self::Single(RouteArg::from(value))
                }
            }
        )*
    };
}

route_arg_from_scalar!(
    Scalar, &str, String, bool, f64, i8, i16, i32, i64, u8, u16, u32, u64, usize
);

impl From<&String> for RouteArg {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl TryFrom<Value> for RouteArg {
    type Error = ResolveError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Absent),
            Value::Array(_) => Err(ResolveError::UnsupportedArgument {
                found: "an array",
            }),
            Value::Object(fields) => Ok(Self::Entity(
                fields
                    .into_iter()
                    .filter_map(|(k, v)| json_scalar(v).map(|s| (k, s)))
                    .collect(),
            )),
            other => json_scalar(other)
                .map(Self::Scalar)
                .ok_or(ResolveError::UnsupportedArgument { found: "a value" }),
        }
    }
}

/// Convert a JSON scalar; `None` for null, arrays and objects.
fn json_scalar(value: Value) -> Option<Scalar> {
    match value {
        Value::Bool(b) => Some(Scalar::Bool(b)),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => Scalar::Int(i),
            // u64 beyond i64 keeps its exact decimal text
            None if n.is_u64() => Scalar::Str(n.to_string()),
            None => Scalar::Float(n.as_f64().unwrap_or_default()),
        }),
        Value::String(s) => Some(Scalar::Str(s)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// The full argument bundle of one call.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RouteArgs {
    /// No arguments.
    #[default]
    None,
    /// One argument, bound to the first placeholder.
    Single(RouteArg),
    /// Arguments bound to placeholders by position.
    Positional(Vec<RouteArg>),
    /// Arguments bound to placeholders by name.
    Named(Vec<(String, RouteArg)>),
}

impl RouteArgs {
    /// Build a by-name bundle.
    ///
    /// ```
    /// use route_bindings::RouteArgs;
    ///
    /// let args = RouteArgs::named([("post", 7), ("comment", 3)]);
    /// ```
    pub fn named<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<RouteArg>,
    {
        Self::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a positional bundle.
    pub fn positional<V: Into<RouteArg>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl From<()> for RouteArgs {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<RouteArg> for RouteArgs {
    fn from(arg: RouteArg) -> Self {
        Self::Single(arg)
    }
}

impl<V: Into<RouteArg>> From<Vec<V>> for RouteArgs {
    fn from(values: Vec<V>) -> Self {
        Self::positional(values)
    }
}

impl<V: Into<RouteArg>, const N: usize> From<[V; N]> for RouteArgs {
    fn from(values: [V; N]) -> Self {
        Self::positional(values)
    }
}

impl TryFrom<Value> for RouteArgs {
    type Error = ResolveError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::None),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Array(_) => Err(ResolveError::UnsupportedArgument {
                        found: "a nested array",
                    }),
                    other => RouteArg::try_from(other),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Positional),
            Value::Object(fields) => fields
                .into_iter()
                .map(|(k, v)| RouteArg::try_from(v).map(|arg| (k, arg)))
                .collect::<Result<Vec<_>>>()
                .map(Self::Named),
            scalar => RouteArg::try_from(scalar).map(Self::Single),
        }
    }
}

/// Normalize `args` into the canonical placeholder map for `definition`.
///
/// Unbound placeholders are filled from the route's own defaults first and
/// from `url_defaults` (registry-wide) second. Names that are not
/// placeholders of the template are dropped.
///
/// # Errors
///
/// - [`ResolveError::MalformedArgument`] — an entity lacks its binding field
/// - [`ResolveError::MissingParameter`] — a required placeholder stays unbound
/// - [`ResolveError::OptionalParameterGap`] — an optional placeholder is
///   missing while a later optional one is bound
pub fn normalize(
    definition: &RouteDefinition,
    args: &RouteArgs,
    url_defaults: &BTreeMap<String, Scalar>,
) -> Result<BTreeMap<String, String>> {
    let params: Vec<&Placeholder> = definition.template().parameters().collect();
    let mut values = BTreeMap::new();

    for (placeholder, arg) in bind(&params, args) {
        if let Some(value) = unwrap_arg(definition, placeholder, &arg)? {
            values.insert(placeholder.name().to_string(), value);
        }
    }

    for placeholder in &params {
        let name = placeholder.name();
        if values.contains_key(name) {
            continue;
        }
        let fallback = definition
            .defaults()
            .get(name)
            .or_else(|| url_defaults.get(name));
        match fallback {
            Some(value) => {
                tracing::trace!(route = definition.name(), param = name, %value, "applied default");
                values.insert(name.to_string(), value.to_string());
            }
            None if !placeholder.is_optional() => {
                return Err(ResolveError::MissingParameter {
                    route: definition.name().to_string(),
                    param: name.to_string(),
                });
            }
            None => {}
        }
    }

    check_optional_suffix(definition, &params, &values)?;
    Ok(values)
}

/// Pair placeholders with the arguments supplied for them.
fn bind<'p>(params: &[&'p Placeholder], args: &RouteArgs) -> Vec<(&'p Placeholder, RouteArg)> {
    match args {
        RouteArgs::None => Vec::new(),
        RouteArgs::Single(arg) => params
            .first()
            .map(|p| vec![(*p, arg.clone())])
            .unwrap_or_default(),
        RouteArgs::Positional(list) => params
            .iter()
            .copied()
            .zip(list.iter().cloned())
            .collect(),
        RouteArgs::Named(pairs) => {
            if let Some(entity) = named_as_entity(params, pairs) {
                return vec![(params[0], entity)];
            }
            params
                .iter()
                .filter_map(|p| {
                    pairs
                        .iter()
                        .find(|(k, _)| k == p.name())
                        .map(|(_, arg)| (*p, arg.clone()))
                })
                .collect()
        }
    }
}

/// A by-name bundle for a single-placeholder route that carries the
/// placeholder's binding field instead of its name is the entity itself.
fn named_as_entity(params: &[&Placeholder], pairs: &[(String, RouteArg)]) -> Option<RouteArg> {
    let [only] = params else {
        return None;
    };
    let has = |key: &str| pairs.iter().any(|(k, _)| k == key);
    if has(only.name()) || !has(only.binding_field()) {
        return None;
    }
    Some(RouteArg::Entity(
        pairs
            .iter()
            .filter_map(|(k, v)| match v {
                RouteArg::Scalar(s) => Some((k.clone(), s.clone())),
                RouteArg::Entity(_) | RouteArg::Absent => None,
            })
            .collect(),
    ))
}

fn unwrap_arg(
    definition: &RouteDefinition,
    placeholder: &Placeholder,
    arg: &RouteArg,
) -> Result<Option<String>> {
    match arg {
        RouteArg::Scalar(value) => Ok(Some(value.to_string())),
        RouteArg::Entity(fields) => {
            let field = placeholder.binding_field();
            fields
                .get(field)
                .map(|value| Some(value.to_string()))
                .ok_or_else(|| ResolveError::MalformedArgument {
                    route: definition.name().to_string(),
                    param: placeholder.name().to_string(),
                    reason: format!("object has no '{field}' field"),
                })
        }
        RouteArg::Absent => Ok(None),
    }
}

fn check_optional_suffix(
    definition: &RouteDefinition,
    params: &[&Placeholder],
    values: &BTreeMap<String, String>,
) -> Result<()> {
    let mut first_missing: Option<&str> = None;
    for placeholder in params.iter().filter(|p| p.is_optional()) {
        let bound = values.contains_key(placeholder.name());
        match (bound, first_missing) {
            (false, None) => first_missing = Some(placeholder.name()),
            (true, Some(missing)) => {
                return Err(ResolveError::OptionalParameterGap {
                    route: definition.name().to_string(),
                    param: missing.to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}
