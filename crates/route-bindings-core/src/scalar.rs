//! Scalar values bound to route placeholders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single path argument or default value.
///
/// Rendered with [`Display`](fmt::Display): integers in plain base 10,
/// floats without a trailing `.0` when integral, strings verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A boolean (`true` / `false`).
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string, used verbatim.
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            // f64 Display already drops the fractional part of integral values
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

macro_rules! scalar_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar {
                fn from(n: $ty) -> Self {
                    Self::Int(i64::from(n))
                }
            }
        )*
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! scalar_from_wide_uint {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Scalar {
                /// Values above `i64::MAX` keep their exact decimal text.
                fn from(n: $ty) -> Self {
                    i64::try_from(n).map_or_else(|_| Self::Str(n.to_string()), Self::Int)
                }
            }
        )*
    };
}

scalar_from_wide_uint!(u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_base_ten() {
        assert_eq!(Scalar::Int(7).to_string(), "7");
        assert_eq!(Scalar::Int(-12_345_678).to_string(), "-12345678");
        assert_eq!(Scalar::Float(2.0).to_string(), "2");
        assert_eq!(Scalar::Float(1.5).to_string(), "1.5");
        assert_eq!(Scalar::from("abc-def").to_string(), "abc-def");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
    }

    #[test]
    fn wide_unsigned_ints_keep_exact_text() {
        assert_eq!(Scalar::from(42_u64), Scalar::Int(42));
        assert_eq!(Scalar::from(7_usize), Scalar::Int(7));
        assert_eq!(
            Scalar::from(u64::MAX),
            Scalar::Str("18446744073709551615".to_string())
        );
        assert_eq!(Scalar::from(u64::MAX).to_string(), "18446744073709551615");
    }

    #[test]
    fn deserializes_untagged() {
        let values: Vec<Scalar> = serde_json::from_str(r#"[1, 2.5, "x", false]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Scalar::Int(1),
                Scalar::Float(2.5),
                Scalar::Str("x".to_string()),
                Scalar::Bool(false),
            ]
        );
    }
}
