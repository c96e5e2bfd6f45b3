//! The attr tree node.
//!
//! An [`Attr`] is exactly one of a scalar, a dictionary or a list. Children
//! are owned by their parent; `clone()` copies the whole subtree.
//!
//! Lookups never fail. A missing key, an out-of-range index or a lookup on
//! the wrong kind yields [`INVALID`], a shared immutable `Empty` scalar, so
//! chains like `attr.get("a").get("b").at(3)` are always safe to traverse.

use crate::dic::AttrDic;
use crate::list::AttrList;
use crate::value::{AttrValue, EMPTY_VALUE};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Kind discriminator of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    Value,
    Dictionary,
    List,
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttrType::Value => "value",
            AttrType::Dictionary => "dictionary",
            AttrType::List => "list",
        };
        f.write_str(name)
    }
}

/// A node of the attr tree.
#[derive(Debug, Clone)]
pub enum Attr {
    Value(AttrValue),
    Dic(AttrDic),
    List(AttrList),
}

/// The sentinel returned for missing keys, out-of-range indices and
/// wrong-kind lookups.
pub static INVALID: Attr = Attr::Value(AttrValue::Empty);

impl Default for Attr {
    fn default() -> Self {
        Attr::Value(AttrValue::Empty)
    }
}

impl Attr {
    /// A fresh `Empty` scalar.
    pub fn empty() -> Self {
        Attr::default()
    }

    /// The shared sentinel, see [`INVALID`].
    pub fn invalid() -> &'static Attr {
        &INVALID
    }

    pub fn attr_type(&self) -> AttrType {
        match self {
            Attr::Value(_) => AttrType::Value,
            Attr::Dic(_) => AttrType::Dictionary,
            Attr::List(_) => AttrType::List,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Attr::Value(_))
    }

    pub fn is_dic(&self) -> bool {
        matches!(self, Attr::Dic(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Attr::List(_))
    }

    /// True for an `Empty` scalar.
    pub fn is_null_or_empty(&self) -> bool {
        matches!(self, Attr::Value(AttrValue::Empty))
    }

    /// The scalar payload, or the shared `Empty` scalar for containers.
    pub fn as_value(&self) -> &AttrValue {
        match self {
            Attr::Value(v) => v,
            _ => &EMPTY_VALUE,
        }
    }

    /// View this node as a dictionary.
    ///
    /// A list is reinterpreted with its stringified indices as keys; a scalar
    /// yields a fresh empty dictionary.
    pub fn as_dic(&self) -> Cow<'_, AttrDic> {
        match self {
            Attr::Dic(dic) => Cow::Borrowed(dic),
            Attr::List(list) => Cow::Owned(list.to_dic()),
            Attr::Value(_) => Cow::Owned(AttrDic::new()),
        }
    }

    /// View this node as a list.
    ///
    /// A dictionary is projected onto its values in enumeration order; a
    /// scalar yields a fresh empty list.
    pub fn as_list(&self) -> Cow<'_, AttrList> {
        match self {
            Attr::List(list) => Cow::Borrowed(list),
            Attr::Dic(dic) => Cow::Owned(dic.to_list()),
            Attr::Value(_) => Cow::Owned(AttrList::new()),
        }
    }

    pub fn as_value_mut(&mut self) -> Option<&mut AttrValue> {
        match self {
            Attr::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_dic_mut(&mut self) -> Option<&mut AttrDic> {
        match self {
            Attr::Dic(dic) => Some(dic),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut AttrList> {
        match self {
            Attr::List(list) => Some(list),
            _ => None,
        }
    }

    /// Like [`Attr::as_value`], reporting a diagnostic when this is not a scalar.
    pub fn assert_value(&self) -> &AttrValue {
        if !self.is_value() {
            debug_diagnostic!(kind = %self.attr_type(), "expected a value node");
        }
        self.as_value()
    }

    /// Like [`Attr::as_dic`], reporting a diagnostic when this is not a dictionary.
    pub fn assert_dic(&self) -> Cow<'_, AttrDic> {
        if !self.is_dic() {
            debug_diagnostic!(kind = %self.attr_type(), "expected a dictionary node");
        }
        self.as_dic()
    }

    /// Like [`Attr::as_list`], reporting a diagnostic when this is not a list.
    pub fn assert_list(&self) -> Cow<'_, AttrList> {
        if !self.is_list() {
            debug_diagnostic!(kind = %self.attr_type(), "expected a list node");
        }
        self.as_list()
    }

    /// Child under `key` when this is a dictionary, [`INVALID`] otherwise.
    pub fn get(&self, key: &str) -> &Attr {
        match self {
            Attr::Dic(dic) => dic.get(key),
            _ => &INVALID,
        }
    }

    /// Element at `idx` when this is a list, [`INVALID`] otherwise.
    pub fn at(&self, idx: usize) -> &Attr {
        match self {
            Attr::List(list) => list.get(idx),
            _ => &INVALID,
        }
    }

    /// Consume this node as a dictionary, reinterpreting a list by index.
    /// Children are moved, not copied.
    pub fn into_dic(self) -> AttrDic {
        match self {
            Attr::Dic(dic) => dic,
            Attr::List(list) => list.into_dic(),
            Attr::Value(_) => AttrDic::new(),
        }
    }

    /// Consume this node as a list, keeping dictionary values only.
    pub fn into_list(self) -> AttrList {
        match self {
            Attr::List(list) => list,
            Attr::Dic(dic) => dic.into_list(),
            Attr::Value(_) => AttrList::new(),
        }
    }
}

impl PartialEq for Attr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Attr::Value(a), Attr::Value(b)) => a == b,
            (Attr::Dic(a), Attr::Dic(b)) => a == b,
            (Attr::List(a), Attr::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Hash for Attr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.attr_type().hash(state);
        match self {
            Attr::Value(v) => v.hash(state),
            Attr::Dic(dic) => dic.hash(state),
            Attr::List(list) => list.hash(state),
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Value(v) => fmt::Display::fmt(v, f),
            Attr::Dic(dic) => fmt::Display::fmt(dic, f),
            Attr::List(list) => fmt::Display::fmt(list, f),
        }
    }
}

impl From<AttrValue> for Attr {
    fn from(v: AttrValue) -> Self {
        Attr::Value(v)
    }
}

impl From<AttrDic> for Attr {
    fn from(v: AttrDic) -> Self {
        Attr::Dic(v)
    }
}

impl From<AttrList> for Attr {
    fn from(v: AttrList) -> Self {
        Attr::List(v)
    }
}

macro_rules! attr_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Attr {
                fn from(v: $ty) -> Self {
                    Attr::Value(AttrValue::from(v))
                }
            }
        )*
    };
}

attr_from_scalar!(bool, i16, i32, i64, f32, f64, String, &str);
