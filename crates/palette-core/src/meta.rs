//! Typed metadata values for palettes.
//!
//! [`MetaValue`] can hold any value a palette codec stores alongside the
//! colors: numeric book parameters, format labels, or whole foreign
//! metadata blocks carried through a round-trip. The container never
//! interprets values; only the codecs and the CLI read specific keys.

use std::collections::BTreeMap;
use std::fmt;

/// A metadata value attached to a palette under a string key.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// Absent/null value (e.g. JSON `null` carried through a round-trip).
    Null,
    /// Boolean value.
    Bool(bool),
    /// UTF-8 string value.
    Str(String),
    /// Unsigned value; book IDs, versions and page counts live here.
    UInt(u32),
    /// Signed value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Ordered list of values.
    List(Vec<MetaValue>),
    /// Nested key-value block.
    Map(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    /// Tries to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Tries to get as u16; `UInt` and in-range `Int` values convert.
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            MetaValue::UInt(v) => u16::try_from(*v).ok(),
            MetaValue::Int(v) => u16::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Tries to get as u32.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            MetaValue::UInt(v) => Some(*v),
            MetaValue::Int(v) => u32::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Tries to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Int(v) => Some(*v),
            MetaValue::UInt(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Tries to get as f64, converting from the integer variants.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Float(v) => Some(*v),
            MetaValue::Int(v) => Some(*v as f64),
            MetaValue::UInt(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    /// Tries to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Null => write!(f, "null"),
            MetaValue::Bool(v) => write!(f, "{v}"),
            MetaValue::Str(v) => write!(f, "{v}"),
            MetaValue::UInt(v) => write!(f, "{v}"),
            MetaValue::Int(v) => write!(f, "{v}"),
            MetaValue::Float(v) => write!(f, "{v}"),
            MetaValue::List(v) => write!(f, "[{} items]", v.len()),
            MetaValue::Map(v) => write!(f, "{{{} entries}}", v.len()),
        }
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        MetaValue::Bool(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Str(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Str(v)
    }
}

impl From<u16> for MetaValue {
    fn from(v: u16) -> Self {
        MetaValue::UInt(u32::from(v))
    }
}

impl From<u32> for MetaValue {
    fn from(v: u32) -> Self {
        MetaValue::UInt(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        MetaValue::Int(v)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        MetaValue::Float(v)
    }
}
