//! Index-ordered list node.

use crate::attr::{Attr, INVALID};
use crate::convert::FromAttrValue;
use crate::dic::AttrDic;
use crate::error::Result;
use crate::value::{AttrValue, EMPTY_VALUE};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An ordered list of attr nodes.
///
/// When `allow_duplicates` is off, `add`, `insert` and `set` refuse a value
/// structurally equal to an element already present and return `false`.
/// None of the mutators panic; out-of-range positions also return `false`.
#[derive(Debug, Clone)]
pub struct AttrList {
    items: Vec<Attr>,
    allow_duplicates: bool,
}

impl Default for AttrList {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            allow_duplicates: true,
        }
    }
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            allow_duplicates: true,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Change the duplicate policy. Elements already present are kept.
    pub fn set_allow_duplicates(&mut self, allow: bool) {
        self.allow_duplicates = allow;
    }

    fn admits(&self, attr: &Attr, replacing: Option<usize>) -> bool {
        self.allow_duplicates
            || !self
                .items
                .iter()
                .enumerate()
                .any(|(i, existing)| Some(i) != replacing && existing == attr)
    }

    pub fn add<V: Into<Attr>>(&mut self, attr: V) -> bool {
        let attr = attr.into();
        if !self.admits(&attr, None) {
            return false;
        }
        self.items.push(attr);
        true
    }

    /// Insert at `idx`, shifting later elements. `idx == len()` appends.
    pub fn insert<V: Into<Attr>>(&mut self, idx: usize, attr: V) -> bool {
        if idx > self.items.len() {
            return false;
        }
        let attr = attr.into();
        if !self.admits(&attr, None) {
            return false;
        }
        self.items.insert(idx, attr);
        true
    }

    /// Replace the element at `idx`.
    pub fn set<V: Into<Attr>>(&mut self, idx: usize, attr: V) -> bool {
        if idx >= self.items.len() {
            return false;
        }
        let attr = attr.into();
        if !self.admits(&attr, Some(idx)) {
            return false;
        }
        self.items[idx] = attr;
        true
    }

    pub fn add_value<V: Into<AttrValue>>(&mut self, value: V) -> bool {
        self.add(Attr::Value(value.into()))
    }

    pub fn insert_value<V: Into<AttrValue>>(&mut self, idx: usize, value: V) -> bool {
        self.insert(idx, Attr::Value(value.into()))
    }

    pub fn set_value<V: Into<AttrValue>>(&mut self, idx: usize, value: V) -> bool {
        self.set(idx, Attr::Value(value.into()))
    }

    /// Element at `idx`, or [`INVALID`] when out of range.
    pub fn get(&self, idx: usize) -> &Attr {
        self.items.get(idx).unwrap_or(&INVALID)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Attr> {
        self.items.get_mut(idx)
    }

    /// Scalar at `idx`; out-of-range positions and containers yield `Empty`.
    pub fn get_value(&self, idx: usize) -> &AttrValue {
        match self.items.get(idx) {
            Some(attr) => attr.as_value(),
            None => &EMPTY_VALUE,
        }
    }

    /// Extract the element at `idx` as `V` through [`FromAttrValue`].
    pub fn get_as<V: FromAttrValue>(&self, idx: usize) -> Result<V> {
        V::from_attr_value(self.get_value(idx))
    }

    pub fn index_of(&self, attr: &Attr) -> Option<usize> {
        self.items.iter().position(|v| v == attr)
    }

    pub fn contains(&self, attr: &Attr) -> bool {
        self.index_of(attr).is_some()
    }

    /// Remove the first element equal to `attr`.
    pub fn remove(&mut self, attr: &Attr) -> bool {
        match self.index_of(attr) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn remove_at(&mut self, idx: usize) -> Option<Attr> {
        if idx < self.items.len() {
            Some(self.items.remove(idx))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attr> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Attr> {
        self.items.iter_mut()
    }

    /// Extract every element as `V` through [`FromAttrValue`].
    pub fn to_vec<V: FromAttrValue>(&self) -> Result<Vec<V>> {
        self.items
            .iter()
            .map(|v| V::from_attr_value(v.as_value()))
            .collect()
    }

    /// Reinterpret as a dictionary keyed by stringified index, deep-copying
    /// every element.
    pub fn to_dic(&self) -> AttrDic {
        self.items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect()
    }

    pub(crate) fn into_dic(self) -> AttrDic {
        self.items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect()
    }
}

impl PartialEq for AttrList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Hash for AttrList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl fmt::Display for AttrList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", item)?;
        }
        f.write_str("]")
    }
}

impl From<AttrDic> for AttrList {
    fn from(dic: AttrDic) -> Self {
        dic.into_list()
    }
}

impl<V: Into<Attr>> FromIterator<V> for AttrList {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
            allow_duplicates: true,
        }
    }
}

impl IntoIterator for AttrList {
    type Item = Attr;
    type IntoIter = std::vec::IntoIter<Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttrList {
    type Item = &'a Attr;
    type IntoIter = std::slice::Iter<'a, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
