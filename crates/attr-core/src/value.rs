//! Scalar payloads of the attr tree.
//!
//! An [`AttrValue`] holds exactly one typed payload. Its sub-kind never
//! changes after construction: the `set_*` family converts the argument into
//! the existing sub-kind, and the `to_*` family converts the payload out of it.
//! Both directions are total. Conversions that lose information emit a
//! debug-only diagnostic and still return the truncated value.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Sub-kind discriminator of a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrValueType {
    Empty,
    String,
    Bool,
    Int,
    Long,
    Float,
    Double,
}

impl fmt::Display for AttrValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttrValueType::Empty => "empty",
            AttrValueType::String => "string",
            AttrValueType::Bool => "bool",
            AttrValueType::Int => "int",
            AttrValueType::Long => "long",
            AttrValueType::Float => "float",
            AttrValueType::Double => "double",
        };
        f.write_str(name)
    }
}

/// A scalar attr value.
#[derive(Debug, Clone, Default)]
pub enum AttrValue {
    #[default]
    Empty,
    String(String),
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

/// Shared sentinel returned by scalar accessors on non-scalar nodes.
pub(crate) static EMPTY_VALUE: AttrValue = AttrValue::Empty;

impl AttrValue {
    pub fn value_type(&self) -> AttrValueType {
        match self {
            AttrValue::Empty => AttrValueType::Empty,
            AttrValue::String(_) => AttrValueType::String,
            AttrValue::Bool(_) => AttrValueType::Bool,
            AttrValue::Int(_) => AttrValueType::Int,
            AttrValue::Long(_) => AttrValueType::Long,
            AttrValue::Float(_) => AttrValueType::Float,
            AttrValue::Double(_) => AttrValueType::Double,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AttrValue::Empty)
    }

    /// Borrow the payload of a `String` scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_int(&self) -> i32 {
        match self {
            AttrValue::Empty => 0,
            AttrValue::String(s) => s.trim().parse().unwrap_or(0),
            AttrValue::Bool(b) => i32::from(*b),
            AttrValue::Int(v) => *v,
            AttrValue::Long(v) => {
                if i32::try_from(*v).is_err() {
                    debug_diagnostic!(value = *v, "long to int conversion loses precision");
                }
                *v as i32
            }
            AttrValue::Float(v) => {
                debug_diagnostic!(value = *v, "float to int conversion loses precision");
                *v as i32
            }
            AttrValue::Double(v) => {
                debug_diagnostic!(value = *v, "double to int conversion loses precision");
                *v as i32
            }
        }
    }

    pub fn to_long(&self) -> i64 {
        match self {
            AttrValue::Empty => 0,
            AttrValue::String(s) => s.trim().parse().unwrap_or(0),
            AttrValue::Bool(b) => i64::from(*b),
            AttrValue::Int(v) => i64::from(*v),
            AttrValue::Long(v) => *v,
            AttrValue::Float(v) => {
                debug_diagnostic!(value = *v, "float to long conversion loses precision");
                *v as i64
            }
            AttrValue::Double(v) => {
                debug_diagnostic!(value = *v, "double to long conversion loses precision");
                *v as i64
            }
        }
    }

    pub fn to_float(&self) -> f32 {
        match self {
            AttrValue::Empty => 0.0,
            AttrValue::String(s) => s.trim().parse().unwrap_or(0.0),
            AttrValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            AttrValue::Int(v) => *v as f32,
            AttrValue::Long(v) => *v as f32,
            AttrValue::Float(v) => *v,
            AttrValue::Double(v) => {
                if v.is_finite() && (*v > f64::from(f32::MAX) || *v < f64::from(f32::MIN)) {
                    debug_diagnostic!(value = *v, "double to float conversion overflows");
                }
                *v as f32
            }
        }
    }

    pub fn to_double(&self) -> f64 {
        match self {
            AttrValue::Empty => 0.0,
            AttrValue::String(s) => s.trim().parse().unwrap_or(0.0),
            AttrValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            AttrValue::Int(v) => f64::from(*v),
            AttrValue::Long(v) => *v as f64,
            AttrValue::Float(v) => f64::from(*v),
            AttrValue::Double(v) => *v,
        }
    }

    /// Numeric payloads are true when non-zero. Strings accept `true`/`false`
    /// in any case and are false otherwise.
    pub fn to_bool(&self) -> bool {
        match self {
            AttrValue::Empty => false,
            AttrValue::String(s) => s.trim().eq_ignore_ascii_case("true"),
            AttrValue::Bool(b) => *b,
            AttrValue::Int(v) => *v != 0,
            AttrValue::Long(v) => *v != 0,
            AttrValue::Float(v) => *v != 0.0,
            AttrValue::Double(v) => *v != 0.0,
        }
    }

    pub fn set_int(&mut self, val: i32) {
        match self {
            AttrValue::Empty => {}
            AttrValue::String(s) => *s = val.to_string(),
            AttrValue::Bool(b) => *b = val != 0,
            AttrValue::Int(v) => *v = val,
            AttrValue::Long(v) => *v = i64::from(val),
            AttrValue::Float(v) => *v = val as f32,
            AttrValue::Double(v) => *v = f64::from(val),
        }
    }

    pub fn set_long(&mut self, val: i64) {
        match self {
            AttrValue::Empty => {}
            AttrValue::String(s) => *s = val.to_string(),
            AttrValue::Bool(b) => *b = val != 0,
            AttrValue::Int(v) => {
                if i32::try_from(val).is_err() {
                    debug_diagnostic!(value = val, "storing long in int loses precision");
                }
                *v = val as i32;
            }
            AttrValue::Long(v) => *v = val,
            AttrValue::Float(v) => *v = val as f32,
            AttrValue::Double(v) => *v = val as f64,
        }
    }

    pub fn set_float(&mut self, val: f32) {
        match self {
            AttrValue::Empty => {}
            AttrValue::String(s) => *s = val.to_string(),
            AttrValue::Bool(b) => *b = val != 0.0,
            AttrValue::Int(v) => *v = val as i32,
            AttrValue::Long(v) => {
                debug_diagnostic!(value = val, "storing float in long loses precision");
                *v = val as i64;
            }
            AttrValue::Float(v) => *v = val,
            AttrValue::Double(v) => *v = f64::from(val),
        }
    }

    pub fn set_double(&mut self, val: f64) {
        match self {
            AttrValue::Empty => {}
            AttrValue::String(s) => *s = val.to_string(),
            AttrValue::Bool(b) => *b = val != 0.0,
            AttrValue::Int(v) => *v = val as i32,
            AttrValue::Long(v) => {
                debug_diagnostic!(value = val, "storing double in long loses precision");
                *v = val as i64;
            }
            AttrValue::Float(v) => *v = val as f32,
            AttrValue::Double(v) => *v = val,
        }
    }

    pub fn set_bool(&mut self, val: bool) {
        match self {
            AttrValue::Empty => {}
            AttrValue::String(s) => *s = val.to_string(),
            AttrValue::Bool(b) => *b = val,
            other => other.set_int(i32::from(val)),
        }
    }

    /// Best-effort parse of `val` into the current sub-kind. Unparsable text
    /// yields the zero value of numeric sub-kinds.
    pub fn set_string(&mut self, val: &str) {
        match self {
            AttrValue::Empty => {}
            AttrValue::String(s) => *s = val.to_string(),
            AttrValue::Bool(b) => {
                *b = match val.trim() {
                    "true" => true,
                    "false" | "0" | "" => false,
                    _ => true,
                }
            }
            AttrValue::Int(v) => *v = val.trim().parse().unwrap_or(0),
            AttrValue::Long(v) => *v = val.trim().parse().unwrap_or(0),
            AttrValue::Float(v) => *v = val.trim().parse().unwrap_or(0.0),
            AttrValue::Double(v) => *v = val.trim().parse().unwrap_or(0.0),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Empty => Ok(()),
            AttrValue::String(s) => f.write_str(s),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Long(v) => write!(f, "{}", v),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::Double(v) => write!(f, "{}", v),
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Empty, AttrValue::Empty) => true,
            (AttrValue::String(a), AttrValue::String(b)) => a == b,
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a == b,
            (AttrValue::Int(a), AttrValue::Int(b)) => a == b,
            (AttrValue::Long(a), AttrValue::Long(b)) => a == b,
            (AttrValue::Float(a), AttrValue::Float(b)) => a == b,
            (AttrValue::Double(a), AttrValue::Double(b)) => a == b,
            _ => false,
        }
    }
}

// -0.0 and 0.0 compare equal, so they must hash the same.
fn float_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

impl Hash for AttrValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value_type().hash(state);
        match self {
            AttrValue::Empty => {}
            AttrValue::String(s) => s.hash(state),
            AttrValue::Bool(b) => b.hash(state),
            AttrValue::Int(v) => v.hash(state),
            AttrValue::Long(v) => v.hash(state),
            AttrValue::Float(v) => float_bits(f64::from(*v)).hash(state),
            AttrValue::Double(v) => float_bits(*v).hash(state),
        }
    }
}

// Typed comparisons go through the `to_*` getters, so `AttrValue::Long(5) == 5` holds.

impl PartialEq<bool> for AttrValue {
    fn eq(&self, other: &bool) -> bool {
        self.to_bool() == *other
    }
}

impl PartialEq<i32> for AttrValue {
    fn eq(&self, other: &i32) -> bool {
        self.to_int() == *other
    }
}

impl PartialEq<i64> for AttrValue {
    fn eq(&self, other: &i64) -> bool {
        self.to_long() == *other
    }
}

impl PartialEq<f32> for AttrValue {
    fn eq(&self, other: &f32) -> bool {
        self.to_float() == *other
    }
}

impl PartialEq<f64> for AttrValue {
    fn eq(&self, other: &f64) -> bool {
        self.to_double() == *other
    }
}

impl PartialEq<str> for AttrValue {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for AttrValue {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i16> for AttrValue {
    fn from(v: i16) -> Self {
        AttrValue::Int(i32::from(v))
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Long(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Double(v)
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(AttrValue::Empty, Into::into)
    }
}
