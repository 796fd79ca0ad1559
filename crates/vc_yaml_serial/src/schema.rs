//! Tag expansion and implicit typing of plain scalars.
//!
//! A [`Schema`] knows the short (`!!int`) and long (`tag:yaml.org,2002:int`)
//! forms of the built-in tags, maps them to built-in types, and decides
//! what an untagged plain scalar is. [`CoreSchema`] implements the YAML 1.2
//! core schema.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;

use crate::info::{ScalarKind, paths};

// -----------------------------------------------------------------------------
// Schema

/// Schema level tag rules.
pub trait Schema: Send + Sync {
    /// Expands a short tag into its long form, other tags are returned unchanged.
    fn expand_tag<'a>(&self, tag: &'a str) -> Cow<'a, str>;

    /// The built-in type of a long tag.
    fn type_for_default_tag(&self, tag: &str) -> Option<&'static str>;

    /// The short tag of a built-in type.
    fn tag_for_default_type(&self, type_path: &str) -> Option<&'static str>;

    /// The kind of an untagged plain scalar.
    fn resolve_plain(&self, value: &str) -> ScalarKind;
}

// -----------------------------------------------------------------------------
// CoreSchema

const SHORT_PREFIX: &str = "!!";
const LONG_PREFIX: &str = "tag:yaml.org,2002:";

const DEFAULT_TAGS: [(&str, &str); 7] = [
    ("null", paths::NULL),
    ("bool", paths::BOOL),
    ("int", paths::INT),
    ("float", paths::FLOAT),
    ("str", paths::STRING),
    ("seq", paths::SEQUENCE),
    ("map", paths::MAPPING),
];

/// The YAML 1.2 core schema.
///
/// # Examples
///
/// ```
/// use vc_yaml_serial::info::ScalarKind;
/// use vc_yaml_serial::schema::{CoreSchema, Schema};
///
/// let schema = CoreSchema;
/// assert_eq!(schema.expand_tag("!!int"), "tag:yaml.org,2002:int");
/// assert_eq!(schema.resolve_plain("0x1F"), ScalarKind::Int);
/// assert_eq!(schema.resolve_plain("-.inf"), ScalarKind::Float);
/// assert_eq!(schema.resolve_plain("~"), ScalarKind::Null);
/// assert_eq!(schema.resolve_plain("yes"), ScalarKind::Str);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreSchema;

impl Schema for CoreSchema {
    fn expand_tag<'a>(&self, tag: &'a str) -> Cow<'a, str> {
        match tag.strip_prefix(SHORT_PREFIX) {
            Some(suffix) => Cow::Owned(format!("{LONG_PREFIX}{suffix}")),
            None => Cow::Borrowed(tag),
        }
    }

    fn type_for_default_tag(&self, tag: &str) -> Option<&'static str> {
        let suffix = tag.strip_prefix(LONG_PREFIX)?;
        DEFAULT_TAGS
            .iter()
            .find(|(name, _)| *name == suffix)
            .map(|(_, ty)| *ty)
    }

    fn tag_for_default_type(&self, type_path: &str) -> Option<&'static str> {
        match type_path {
            paths::NULL => Some("!!null"),
            paths::BOOL => Some("!!bool"),
            paths::INT => Some("!!int"),
            paths::FLOAT => Some("!!float"),
            paths::STRING => Some("!!str"),
            paths::SEQUENCE => Some("!!seq"),
            paths::MAPPING => Some("!!map"),
            _ => None,
        }
    }

    fn resolve_plain(&self, value: &str) -> ScalarKind {
        if is_null(value) {
            ScalarKind::Null
        } else if parse_bool(value).is_some() {
            ScalarKind::Bool
        } else if parse_int(value).is_some() {
            ScalarKind::Int
        } else if parse_float(value).is_some() {
            ScalarKind::Float
        } else {
            ScalarKind::Str
        }
    }
}

// -----------------------------------------------------------------------------
// Scalar parsing

/// `~`, `null`, `Null`, `NULL` or the empty string.
pub fn is_null(value: &str) -> bool {
    matches!(value, "" | "~" | "null" | "Null" | "NULL")
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Decimal with optional sign, `0o` octal or `0x` hexadecimal.
pub fn parse_int(value: &str) -> Option<i64> {
    for (prefix, radix) in [("0o", 8), ("0x", 16)] {
        if let Some(digits) = value.strip_prefix(prefix) {
            if !all_digits(digits, radix) {
                return None;
            }
            return i64::from_str_radix(digits, radix).ok();
        }
    }
    let unsigned = value.strip_prefix(['-', '+']).unwrap_or(value);
    if !all_digits(unsigned, 10) {
        return None;
    }
    value.parse().ok()
}

/// Any decimal number, `.inf` with optional sign, or `.nan`.
pub fn parse_float(value: &str) -> Option<f64> {
    let (negative, unsigned) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    match unsigned {
        ".inf" | ".Inf" | ".INF" if negative => return Some(f64::NEG_INFINITY),
        ".inf" | ".Inf" | ".INF" => return Some(f64::INFINITY),
        ".nan" | ".NaN" | ".NAN" if unsigned.len() == value.len() => return Some(f64::NAN),
        _ => {}
    }
    if !is_decimal_float(unsigned) {
        return parse_int(value).map(|v| v as f64);
    }
    value.parse().ok()
}

/// Formats a float so that it reads back as a float.
///
/// ```
/// use vc_yaml_serial::schema::format_float;
///
/// assert_eq!(format_float(1.0), "1.0");
/// assert_eq!(format_float(0.25), "0.25");
/// assert_eq!(format_float(f64::NEG_INFINITY), "-.inf");
/// assert_eq!(format_float(f64::NAN), ".nan");
/// ```
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return String::from(".nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { ".inf" } else { "-.inf" });
    }
    let mut text = format!("{value}");
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}

fn all_digits(text: &str, radix: u32) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_digit(radix))
}

// `(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?`
fn is_decimal_float(text: &str) -> bool {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(index) => (&text[..index], Some(&text[index + 1..])),
        None => (text, None),
    };

    let mantissa_ok = match mantissa.split_once('.') {
        Some(("", fraction)) => all_digits(fraction, 10),
        Some((whole, fraction)) => {
            all_digits(whole, 10) && fraction.chars().all(|c| c.is_ascii_digit())
        }
        None => all_digits(mantissa, 10),
    };

    let exponent_ok = match exponent {
        Some(exponent) => all_digits(exponent.strip_prefix(['-', '+']).unwrap_or(exponent), 10),
        None => true,
    };

    mantissa_ok && exponent_ok
}
