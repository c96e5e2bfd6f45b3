//! String-keyed dictionary node.

use crate::attr::{Attr, INVALID};
use crate::convert::FromAttrValue;
use crate::error::Result;
use crate::list::AttrList;
use crate::value::{AttrValue, EMPTY_VALUE};
use indexmap::IndexMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A dictionary of attr nodes keyed by string.
///
/// Keys are unique and enumerate in insertion order. Equality and hashing do
/// not depend on that order.
#[derive(Debug, Clone, Default)]
pub struct AttrDic {
    entries: IndexMap<String, Attr>,
}

impl AttrDic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace `key`. Returns the previous child, if any.
    pub fn set<K: Into<String>, V: Into<Attr>>(&mut self, key: K, attr: V) -> Option<Attr> {
        self.entries.insert(key.into(), attr.into())
    }

    /// Insert or replace `key` with a scalar.
    pub fn set_value<K: Into<String>, V: Into<AttrValue>>(
        &mut self,
        key: K,
        value: V,
    ) -> Option<Attr> {
        self.set(key, Attr::Value(value.into()))
    }

    /// Child under `key`, or [`INVALID`] when absent.
    pub fn get(&self, key: &str) -> &Attr {
        self.entries.get(key).unwrap_or(&INVALID)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Attr> {
        self.entries.get_mut(key)
    }

    /// Scalar under `key`; absent keys and containers yield an `Empty` scalar.
    pub fn get_value(&self, key: &str) -> &AttrValue {
        match self.entries.get(key) {
            Some(attr) => attr.as_value(),
            None => &EMPTY_VALUE,
        }
    }

    /// Child under `key`, inserting the result of `default` first when absent.
    pub fn get_or_insert_with<K, F>(&mut self, key: K, default: F) -> &mut Attr
    where
        K: Into<String>,
        F: FnOnce() -> Attr,
    {
        self.entries.entry(key.into()).or_insert_with(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn contains_value(&self, attr: &Attr) -> bool {
        self.entries.values().any(|v| v == attr)
    }

    /// Remove `key`, keeping the relative order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Attr> {
        self.entries.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Attr> {
        self.entries.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Attr> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Attr> {
        self.entries.iter_mut()
    }

    /// Project onto a list of deep-copied values, dropping the keys.
    pub fn to_list(&self) -> AttrList {
        self.entries.values().cloned().collect()
    }

    pub(crate) fn into_list(self) -> AttrList {
        self.entries.into_values().collect()
    }

    /// Extract every entry as `V` through [`FromAttrValue`].
    pub fn to_map<V: FromAttrValue>(&self) -> Result<IndexMap<String, V>> {
        self.entries
            .iter()
            .map(|(k, v)| Ok((k.clone(), V::from_attr_value(v.as_value())?)))
            .collect()
    }
}

impl PartialEq for AttrDic {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Hash for AttrDic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Entries are hashed independently and summed so that enumeration
        // order, which equality ignores, cannot change the result.
        let combined = self.entries.iter().fold(0u64, |acc, entry| {
            let mut hasher = DefaultHasher::new();
            entry.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        self.entries.len().hash(state);
        combined.hash(state);
    }
}

impl fmt::Display for AttrDic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", key, value)?;
        }
        f.write_str("}")
    }
}

impl From<AttrList> for AttrDic {
    fn from(list: AttrList) -> Self {
        list.into_dic()
    }
}

impl<K: Into<String>, V: Into<Attr>> FromIterator<(K, V)> for AttrDic {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dic = AttrDic::new();
        for (k, v) in iter {
            dic.set(k, v);
        }
        dic
    }
}

impl<K: Into<String>, V: Into<Attr>> Extend<(K, V)> for AttrDic {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl IntoIterator for AttrDic {
    type Item = (String, Attr);
    type IntoIter = indexmap::map::IntoIter<String, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttrDic {
    type Item = (&'a String, &'a Attr);
    type IntoIter = indexmap::map::Iter<'a, String, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
