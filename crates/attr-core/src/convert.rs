//! Typed extraction from scalars and interop with serde.
//!
//! [`FromAttrValue`] is the dispatch behind `AttrValue::to_value::<T>()`.
//! The primitive types the model stores go through the total `to_*` getters
//! and never fail. Every other integer type converts the raw payload and
//! fails with [`AttrError::Conversion`] when it does not fit.

use crate::attr::Attr;
use crate::dic::AttrDic;
use crate::error::{AttrError, Result};
use crate::list::AttrList;
use crate::value::AttrValue;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};

/// Types that can be extracted from a scalar.
pub trait FromAttrValue: Sized {
    fn from_attr_value(value: &AttrValue) -> Result<Self>;
}

impl AttrValue {
    /// Extract the payload as `T`, see [`FromAttrValue`].
    pub fn to_value<T: FromAttrValue>(&self) -> Result<T> {
        T::from_attr_value(self)
    }

    // Payload as a wide integer, for the fallback conversions.
    fn raw_integer(&self) -> Option<i128> {
        match self {
            AttrValue::Empty => None,
            AttrValue::String(s) => s.trim().parse().ok(),
            AttrValue::Bool(b) => Some(i128::from(*b)),
            AttrValue::Int(v) => Some(i128::from(*v)),
            AttrValue::Long(v) => Some(i128::from(*v)),
            AttrValue::Float(v) => finite_round(f64::from(*v)),
            AttrValue::Double(v) => finite_round(*v),
        }
    }
}

fn finite_round(v: f64) -> Option<i128> {
    if v.is_finite() && v.abs() < 1e38 {
        Some(v.round() as i128)
    } else {
        None
    }
}

macro_rules! from_attr_total {
    ($($ty:ty => $getter:ident),* $(,)?) => {
        $(
            impl FromAttrValue for $ty {
                fn from_attr_value(value: &AttrValue) -> Result<Self> {
                    Ok(value.$getter())
                }
            }
        )*
    };
}

from_attr_total!(
    i32 => to_int,
    i64 => to_long,
    f32 => to_float,
    f64 => to_double,
    bool => to_bool,
    String => to_string,
);

macro_rules! from_attr_fallback {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromAttrValue for $ty {
                fn from_attr_value(value: &AttrValue) -> Result<Self> {
                    value
                        .raw_integer()
                        .and_then(|raw| <$ty>::try_from(raw).ok())
                        .ok_or_else(|| {
                            AttrError::conversion(value.value_type().to_string(), stringify!($ty))
                        })
                }
            }
        )*
    };
}

from_attr_fallback!(i8, i16, isize, u8, u16, u32, u64, usize);

impl FromAttrValue for AttrValue {
    fn from_attr_value(value: &AttrValue) -> Result<Self> {
        Ok(value.clone())
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            AttrValue::Empty => serializer.serialize_unit(),
            AttrValue::String(s) => serializer.serialize_str(s),
            AttrValue::Bool(b) => serializer.serialize_bool(*b),
            AttrValue::Int(v) => serializer.serialize_i32(*v),
            AttrValue::Long(v) => serializer.serialize_i64(*v),
            AttrValue::Float(v) => serializer.serialize_f32(*v),
            AttrValue::Double(v) => serializer.serialize_f64(*v),
        }
    }
}

impl Serialize for AttrDic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for AttrList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl Serialize for Attr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Attr::Value(v) => v.serialize(serializer),
            Attr::Dic(dic) => dic.serialize(serializer),
            Attr::List(list) => list.serialize(serializer),
        }
    }
}

/// Classify a JSON number the same way the native tokenizer does: integers
/// that fit 32 bits are `Int`, other 64-bit integers `Long`, anything else
/// `Double`.
pub(crate) fn number_to_value(n: &Number) -> AttrValue {
    if let Some(i) = n.as_i64() {
        match i32::try_from(i) {
            Ok(small) => AttrValue::Int(small),
            Err(_) => AttrValue::Long(i),
        }
    } else {
        AttrValue::Double(n.as_f64().unwrap_or(0.0))
    }
}

impl From<Value> for Attr {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Attr::empty(),
            Value::Bool(b) => Attr::from(b),
            Value::Number(n) => Attr::Value(number_to_value(&n)),
            Value::String(s) => Attr::from(s),
            Value::Array(items) => Attr::List(items.into_iter().map(Attr::from).collect()),
            Value::Object(map) => Attr::Dic(map.into_iter().map(|(k, v)| (k, Attr::from(v))).collect()),
        }
    }
}

impl From<&AttrValue> for Value {
    fn from(value: &AttrValue) -> Self {
        match value {
            AttrValue::Empty => Value::Null,
            AttrValue::String(s) => Value::String(s.clone()),
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Int(v) => Value::from(*v),
            AttrValue::Long(v) => Value::from(*v),
            AttrValue::Float(v) => Number::from_f64(f64::from(*v)).map_or(Value::Null, Value::Number),
            AttrValue::Double(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
        }
    }
}

impl From<&Attr> for Value {
    fn from(attr: &Attr) -> Self {
        match attr {
            Attr::Value(v) => Value::from(v),
            Attr::Dic(dic) => {
                let map: Map<String, Value> = dic
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect();
                Value::Object(map)
            }
            Attr::List(list) => Value::Array(list.iter().map(Value::from).collect()),
        }
    }
}
