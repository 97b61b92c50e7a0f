//! Resolved request and HTML form descriptors, and method override.
//!
//! HTML forms can only submit `GET` and `POST`. Any other method is sent as
//! `GET` with an override parameter (`_method` by default) carrying the
//! intended method in uppercase:
//!
//! | Declared                                  | Form method | Override        |
//! |-------------------------------------------|-------------|-----------------|
//! | `GET`, `POST`                             | unchanged   | none            |
//! | `HEAD`, `OPTIONS`, `PUT`, `PATCH`, `DELETE` | `get`     | `_method=PUT`   |

use std::fmt;

use route_bindings_core::Method;
use serde::Serialize;

use crate::query::QueryMap;

/// Default name of the method-override query parameter.
pub const DEFAULT_OVERRIDE_PARAM: &str = "_method";

/// A resolved URL paired with the HTTP method to call it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRequest {
    /// Path plus query string.
    pub url: String,
    /// Method, serialized lowercase.
    pub method: Method,
}

impl RouteRequest {
    /// The method as an [`http::Method`].
    #[must_use]
    pub fn http_method(&self) -> http::Method {
        self.method.into()
    }

    /// Start an [`http::Request`] with this method and URI.
    ///
    /// ```
    /// use route_bindings::{Method, RouteRequest};
    ///
    /// let req = RouteRequest { url: "/stock/imprimir?x=1".into(), method: Method::Get };
    /// let http_req = req.http_request_builder().body(()).unwrap();
    /// assert_eq!(http_req.method(), http::Method::GET);
    /// assert_eq!(http_req.uri(), "/stock/imprimir?x=1");
    /// ```
    #[must_use]
    pub fn http_request_builder(&self) -> http::request::Builder {
        http::Request::builder()
            .method(self.http_method())
            .uri(self.url.as_str())
    }
}

/// The only two methods an HTML form can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMethod {
    /// `<form method="get">`
    Get,
    /// `<form method="post">`
    Post,
}

impl FormMethod {
    /// Lowercase attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FormMethod> for Method {
    fn from(method: FormMethod) -> Self {
        match method {
            FormMethod::Get => Self::Get,
            FormMethod::Post => Self::Post,
        }
    }
}

/// An HTML form's `action` and `method` attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormDescriptor {
    /// Form action URL, including any override parameter.
    pub action: String,
    /// Form method.
    pub method: FormMethod,
}

/// The method a form submits for an intended `method`.
///
/// `GET` and `POST` pass through; everything else is forced to `GET`.
#[must_use]
pub const fn form_method_for(method: Method) -> FormMethod {
    match method {
        Method::Post => FormMethod::Post,
        Method::Get | Method::Head | Method::Options | Method::Put | Method::Patch | Method::Delete => {
            FormMethod::Get
        }
    }
}

/// Put the override parameter for `method` ahead of every key in `query`.
///
/// Any caller value under `param` is discarded. Form-native methods leave
/// `query` untouched.
pub fn apply_override(query: &mut QueryMap, method: Method, param: &str) {
    if !method.is_form_native() {
        query.insert_first(param, method.as_upper());
    }
}
