//! HTTP methods accepted by route definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An HTTP method a route accepts.
///
/// Manifests and descriptors use the lowercase spelling (`"get"`); the
/// method-override parameter carries the uppercase one (`"HEAD"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
}

impl Method {
    /// Every method, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Options,
    ];

    /// Lowercase name, as used in manifests and descriptors.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_bindings_core::Method;
    ///
    /// assert_eq!(Method::Head.as_str(), "head");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Head => "head",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Options => "options",
        }
    }

    /// Uppercase name, as carried by the method-override query parameter.
    #[must_use]
    pub const fn as_upper(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }

    /// Whether a plain HTML `<form>` can submit this method directly.
    #[must_use]
    pub const fn is_form_native(self) -> bool {
        matches!(self, Self::Get | Self::Post)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method '{0}'")]
pub struct ParseMethodError(pub String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseMethodError(s.to_string()))
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Head => Self::HEAD,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
            Method::Options => Self::OPTIONS,
        }
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("HEAD".parse::<Method>().unwrap(), Method::Head);
        assert_eq!("Patch".parse::<Method>().unwrap(), Method::Patch);
    }

    #[test]
    fn parse_unknown_errors() {
        let err = "fetch".parse::<Method>().unwrap_err();
        assert_eq!(err.to_string(), "unknown HTTP method 'fetch'");
    }

    #[test]
    fn names_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
            assert_eq!(method.as_upper().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn form_native_only_get_and_post() {
        let native: Vec<_> = Method::ALL
            .into_iter()
            .filter(|m| m.is_form_native())
            .collect();
        assert_eq!(native, vec![Method::Get, Method::Post]);
    }

    #[test]
    fn converts_to_http_method() {
        assert_eq!(http::Method::from(Method::Head), http::Method::HEAD);
        assert_eq!(http::Method::from(Method::Delete), http::Method::DELETE);
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&[Method::Get, Method::Head]).unwrap();
        assert_eq!(json, r#"["get","head"]"#);
        let parsed: Vec<Method> = serde_json::from_str(r#"["POST","delete"]"#).unwrap();
        assert_eq!(parsed, vec![Method::Post, Method::Delete]);
    }
}
