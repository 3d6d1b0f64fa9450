//! Typed reading of scalar text.
//!
//! The parser stores every value as text; consumers ask for a type when they
//! read it. Integers accept an optional sign and a `0x` prefix, and may be
//! read as any primitive integer or as a `BigInt`.

use num_bigint::BigInt;
use num_traits::Num;
use thiserror::Error;

use crate::error::origin_suffix;

/// Types that can be read from a scalar's text.
pub trait FromScalar: Sized {
    /// Name used in error messages.
    const NAME: &'static str;

    fn from_scalar(text: &str) -> Option<Self>;
}

impl FromScalar for String {
    const NAME: &'static str = "string";

    fn from_scalar(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

impl FromScalar for bool {
    const NAME: &'static str = "bool";

    fn from_scalar(text: &str) -> Option<Self> {
        match text {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl FromScalar for char {
    const NAME: &'static str = "char";

    fn from_scalar(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl FromScalar for f32 {
    const NAME: &'static str = "f32";

    fn from_scalar(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl FromScalar for f64 {
    const NAME: &'static str = "f64";

    fn from_scalar(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

macro_rules! impl_from_scalar_integer {
    ($($ty:ident),*) => {
        $(
            impl FromScalar for $ty {
                const NAME: &'static str = stringify!($ty);

                fn from_scalar(text: &str) -> Option<Self> {
                    parse_integer(text)
                }
            }
        )*
    };
}

impl_from_scalar_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FromScalar for BigInt {
    const NAME: &'static str = "integer";

    fn from_scalar(text: &str) -> Option<Self> {
        parse_integer(text)
    }
}

/// Parse `[+-]digits` or `[+-]0xhexdigits`.
fn parse_integer<T: Num>(text: &str) -> Option<T> {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, digits) = match unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, unsigned),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    T::from_str_radix(&format!("{}{}", sign, digits), radix).ok()
}

/// Why a typed read failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoerceErrorKind {
    #[error("missing value")]
    MissingValue,

    #[error("missing child `{0}`")]
    MissingChild(String),

    /// The value exists but has another shape (for example a map).
    #[error("value is not a {0}")]
    WrongShape(&'static str),

    #[error("{text:?} is not a valid {target}")]
    Invalid { text: String, target: &'static str },
}

/// A failed typed read, attributed to the node it was made on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} in {} at line {line}{}", describe(.tag), origin_suffix(.origin))]
pub struct CoerceError {
    pub kind: CoerceErrorKind,
    pub tag: Option<String>,
    pub line: usize,
    pub origin: String,
}

fn describe(tag: &Option<String>) -> String {
    match tag {
        Some(tag) => format!("`{}`", tag),
        None => "list entry".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool() {
        assert_eq!(bool::from_scalar("true"), Some(true));
        assert_eq!(bool::from_scalar("off"), Some(false));
        assert_eq!(bool::from_scalar("True"), None);
    }

    #[test]
    fn test_integers() {
        assert_eq!(i32::from_scalar("42"), Some(42));
        assert_eq!(i32::from_scalar("-42"), Some(-42));
        assert_eq!(i32::from_scalar("+7"), Some(7));
        assert_eq!(u8::from_scalar("0xff"), Some(255));
        assert_eq!(i16::from_scalar("-0x10"), Some(-16));
        assert_eq!(u8::from_scalar("256"), None);
        assert_eq!(u8::from_scalar("-1"), None);
        assert_eq!(i32::from_scalar("--1"), None);
        assert_eq!(i32::from_scalar("0x"), None);
        assert_eq!(i32::from_scalar("1.5"), None);
    }

    #[test]
    fn test_big_integers() {
        let big = BigInt::from_scalar("123456789012345678901234567890").unwrap();
        assert_eq!(big.to_string(), "123456789012345678901234567890");
        assert_eq!(
            BigInt::from_scalar("-0xffffffffffffffffff"),
            Some(-BigInt::from_str_radix("ffffffffffffffffff", 16).unwrap())
        );
        assert_eq!(BigInt::from_scalar("12a"), None);
    }

    #[test]
    fn test_floats_and_chars() {
        assert_eq!(f64::from_scalar("1.5"), Some(1.5));
        assert_eq!(f32::from_scalar("-2"), Some(-2.0));
        assert_eq!(f64::from_scalar("x"), None);
        assert_eq!(char::from_scalar("a"), Some('a'));
        assert_eq!(char::from_scalar("ab"), None);
        assert_eq!(char::from_scalar(""), None);
    }

    #[test]
    fn test_error_display() {
        let err = CoerceError {
            kind: CoerceErrorKind::Invalid {
                text: "big".to_string(),
                target: "u8",
            },
            tag: Some("width".to_string()),
            line: 4,
            origin: "window.otui".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "\"big\" is not a valid u8 in `width` at line 4 of <window.otui>"
        );
    }
}
