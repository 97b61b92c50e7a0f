//! Query string serialization with bracket conventions for arrays and maps.
//!
//! ```text
//! {"page": 2, "tags": ["a", "b"], "filter": {"status": "open"}}
//!   → ?page=2&tags[]=a&tags[]=b&filter[status]=open
//! ```
//!
//! The output is decodable by any bracket-aware query parser (PHP, `qs`,
//! Rack); [`decode`] is the matching parser used by this crate's tests and
//! by callers that want to round-trip the current page's query.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Everything except RFC 3986 unreserved characters is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A query parameter value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryValue {
    /// Omitted from the output; removes the key when merged.
    #[default]
    Null,
    /// Serialized as `1` / `0`.
    Bool(bool),
    /// Serialized in base 10.
    Int(i64),
    /// Serialized with Rust's shortest round-trip formatting.
    Float(f64),
    /// Serialized percent-encoded.
    Str(String),
    /// Serialized as repeated `key[]` (or `key[i]`) pairs.
    List(Vec<QueryValue>),
    /// Serialized as `key[sub]` pairs.
    Map(QueryMap),
}

impl QueryValue {
    const fn is_container(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Text of a scalar value; `None` for null and containers.
    fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(x) => Some(x.to_string()),
            Self::Str(s) => Some(s.clone()),
            Self::Null | Self::List(_) | Self::Map(_) => None,
        }
    }
}

macro_rules! query_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

query_value_from! {
    bool => Bool,
    i8 => Int, i16 => Int, i32 => Int, i64 => Int,
    u8 => Int, u16 => Int, u32 => Int,
    f32 => Float, f64 => Float,
    String => Str, &str => Str,
    QueryMap => Map,
}

impl<T: Into<Self>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None if n.is_u64() => Self::Str(n.to_string()),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(fields) => Self::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// An insertion-ordered map of query parameters.
///
/// Inserting an existing key replaces its value in place, so the key keeps
/// its original position in the output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryMap {
    entries: Vec<(String, QueryValue)>,
}

impl QueryMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from a JSON object; `None` for any other JSON value.
    #[must_use]
    pub fn from_json(value: Value) -> Option<Self> {
        match QueryValue::from(value) {
            QueryValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Insert or replace a value, keeping the key's existing position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(pos) => self.entries[pos].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert a value ahead of every existing key, replacing any previous
    /// value stored under the same key.
    pub fn insert_first(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        self.remove(&key);
        self.entries.insert(0, (key, value.into()));
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.position(key).map(|pos| self.entries.remove(pos).1)
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.position(key).map(|pos| &self.entries[pos].1)
    }

    /// Whether the key is present (even with a [`QueryValue::Null`] value).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to a `?`-prefixed query string (empty when nothing is set).
    #[must_use]
    pub fn to_query_string(&self, format: ArrayFormat) -> String {
        serialize(self, format)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Mutable slot for `key`, inserting [`QueryValue::Null`] if absent.
    fn slot_mut(&mut self, key: &str) -> &mut QueryValue {
        let pos = self.position(key).unwrap_or_else(|| {
            self.entries.push((key.to_string(), QueryValue::Null));
            self.entries.len() - 1
        });
        &mut self.entries[pos].1
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> From<[(K, V); N]> for QueryMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// How array values are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayFormat {
    /// `key[]=a&key[]=b`
    #[default]
    Brackets,
    /// `key[0]=a&key[1]=b`
    Indices,
}

/// Caller-supplied query options for one resolution call.
///
/// - `query` replaces the context parameters entirely;
/// - `merge_query` is merged over them (shallow, top level; a
///   [`QueryValue::Null`] removes the key);
/// - when both are set, `merge_query` wins and `query` is ignored.
///
/// # Examples
///
/// ```
/// use route_bindings::{QueryMap, QueryOptions};
///
/// let current_page = QueryMap::from([("a", 1)]);
/// let options = QueryOptions::merge([("b", 2)]).with_context(current_page);
/// assert_eq!(options.resolve(), QueryMap::from([("a", 1), ("b", 2)]));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryOptions {
    context: QueryMap,
    query: Option<QueryMap>,
    merge_query: Option<QueryMap>,
}

impl QueryOptions {
    /// No query options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that replace the context query with `query`.
    #[must_use]
    pub fn replace(query: impl Into<QueryMap>) -> Self {
        Self::new().with_query(query)
    }

    /// Options that merge `query` over the context query.
    #[must_use]
    pub fn merge(query: impl Into<QueryMap>) -> Self {
        Self::new().with_merge_query(query)
    }

    /// Set the parameters already established by the caller context
    /// (typically the current page's query).
    #[must_use]
    pub fn with_context(mut self, context: impl Into<QueryMap>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the replacing query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<QueryMap>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the merging query.
    #[must_use]
    pub fn with_merge_query(mut self, query: impl Into<QueryMap>) -> Self {
        self.merge_query = Some(query.into());
        self
    }

    /// Read `{"query": {...}}` / `{"mergeQuery": {...}}` options from JSON.
    ///
    /// Unrecognized keys and non-object values are ignored.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let map = |key: &str| value.get(key).cloned().and_then(QueryMap::from_json);
        Self {
            context: QueryMap::new(),
            query: map("query"),
            merge_query: map("mergeQuery").or_else(|| map("merge_query")),
        }
    }

    /// Whether any query was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.context.is_empty() && self.query.is_none() && self.merge_query.is_none()
    }

    /// Apply the precedence rules and return the effective parameters.
    #[must_use]
    pub fn resolve(&self) -> QueryMap {
        match (&self.merge_query, &self.query) {
            (Some(merge), query) => {
                if query.is_some() {
                    tracing::debug!("both query and merge_query supplied; merge_query wins");
                }
                let mut resolved = self.context.clone();
                for (key, value) in merge.iter() {
                    if *value == QueryValue::Null {
                        resolved.remove(key);
                    } else {
                        resolved.insert(key, value.clone());
                    }
                }
                resolved
            }
            (None, Some(query)) => query.clone(),
            (None, None) => self.context.clone(),
        }
    }
}

impl From<QueryMap> for QueryOptions {
    fn from(query: QueryMap) -> Self {
        Self::replace(query)
    }
}

/// Serialize `map` to a `?`-prefixed query string, or `""` when empty.
///
/// With [`ArrayFormat::Brackets`], a call containing an array of arrays or
/// an array of maps switches to [`ArrayFormat::Indices`] as a whole, since
/// `key[][sub]` cannot be decoded unambiguously.
#[must_use]
pub fn serialize(map: &QueryMap, format: ArrayFormat) -> String {
    let format = match format {
        ArrayFormat::Brackets if map.iter().any(|(_, v)| has_nested_list_item(v)) => {
            ArrayFormat::Indices
        }
        other => other,
    };

    let mut pairs = Vec::new();
    for (key, value) in map.iter() {
        flatten(&encode(key), value, format, &mut pairs);
    }

    if pairs.is_empty() {
        return String::new();
    }
    let mut out = String::from("?");
    out.push_str(&pairs.join("&"));
    out
}

fn has_nested_list_item(value: &QueryValue) -> bool {
    match value {
        QueryValue::List(items) => items
            .iter()
            .any(|item| item.is_container() || has_nested_list_item(item)),
        QueryValue::Map(map) => map.iter().any(|(_, v)| has_nested_list_item(v)),
        _ => false,
    }
}

fn flatten(prefix: &str, value: &QueryValue, format: ArrayFormat, out: &mut Vec<String>) {
    match value {
        QueryValue::Null => {}
        QueryValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                let key = match format {
                    ArrayFormat::Brackets => format!("{prefix}[]"),
                    ArrayFormat::Indices => format!("{prefix}[{index}]"),
                };
                flatten(&key, item, format, out);
            }
        }
        QueryValue::Map(map) => {
            for (sub, item) in map.iter() {
                flatten(&format!("{prefix}[{}]", encode(sub)), item, format, out);
            }
        }
        scalar => {
            if let Some(text) = scalar.scalar_text() {
                out.push(format!("{prefix}={}", encode(&text)));
            }
        }
    }
}

fn encode(text: &str) -> String {
    utf8_percent_encode(text, QUERY_COMPONENT).to_string()
}

/// Bracket segments split off a key before the rest is kept as one literal
/// segment.
pub const MAX_DECODE_DEPTH: usize = 32;

/// Parse a bracket-convention query string (optionally `?`-prefixed).
///
/// `+` decodes to a space, `key[]` and `key[N]` build lists, `key[sub]`
/// builds maps; all leaf values come back as [`QueryValue::Str`]. A repeated
/// plain key keeps its last value. Keys nest at most [`MAX_DECODE_DEPTH`]
/// levels; any deeper brackets stay verbatim in the last map key
/// (`a[b][c]` with a depth of 1 decodes as `{"a": {"b": {"[c]": ..}}}`).
#[must_use]
pub fn decode(query: &str) -> QueryMap {
    let mut map = QueryMap::new();
    let query = query.strip_prefix('?').unwrap_or(query);

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(raw_key);
        let value = decode_component(raw_value);
        let (base, path) = split_key(&key);
        assign(map.slot_mut(base), &path, value);
    }

    map
}

fn decode_component(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Split `a[b][]` into `("a", ["b", ""])`; malformed keys are taken literally.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[').filter(|&pos| pos > 0) else {
        return (key, Vec::new());
    };

    let mut path = Vec::new();
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        if path.len() == MAX_DECODE_DEPTH {
            path.push(rest);
            rest = "";
            break;
        }
        let Some(close) = inner.find(']') else {
            return (key, Vec::new());
        };
        path.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    if !rest.is_empty() {
        return (key, Vec::new());
    }

    (&key[..open], path)
}

fn assign(slot: &mut QueryValue, path: &[&str], value: String) {
    let Some((head, rest)) = path.split_first() else {
        *slot = QueryValue::Str(value);
        return;
    };

    if head.is_empty() || head.parse::<usize>().is_ok() {
        let mut items = match std::mem::take(slot) {
            QueryValue::List(items) => items,
            _ => Vec::new(),
        };
        match head.parse::<usize>() {
            Ok(index) if index < items.len() => assign(&mut items[index], rest, value),
            _ => {
                let mut item = QueryValue::Null;
                assign(&mut item, rest, value);
                items.push(item);
            }
        }
        *slot = QueryValue::List(items);
    } else {
        let mut map = match std::mem::take(slot) {
            QueryValue::Map(map) => map,
            _ => QueryMap::new(),
        };
        assign(map.slot_mut(head), rest, value);
        *slot = QueryValue::Map(map);
    }
}
