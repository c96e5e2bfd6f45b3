//! Keyed persistence of attr trees.
//!
//! Storages hold serialized JSON bytes. Trees go through the serializer on
//! `save` and through the tree builder on `load`.

use crate::attr::Attr;
use crate::builder::AttrParser;
use crate::error::Result;
use crate::json::JsonSerializer;
use std::collections::BTreeMap;

pub trait AttrStorage {
    /// The tree stored under `key`, or `None` when there is none.
    fn load(&self, key: &str) -> Result<Option<Attr>>;

    fn save(&mut self, key: &str, attr: &Attr) -> Result<()>;

    fn has(&self, key: &str) -> bool;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Every key currently stored, in ascending order.
    fn stored_keys(&self) -> Vec<String>;
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryAttrStorage {
    entries: BTreeMap<String, Vec<u8>>,
    parser: AttrParser,
    serializer: JsonSerializer,
}

impl MemoryAttrStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(parser: AttrParser, serializer: JsonSerializer) -> Self {
        Self {
            entries: BTreeMap::new(),
            parser,
            serializer,
        }
    }

    /// Raw bytes stored under `key`.
    pub fn raw(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Store bytes as they are, without validating them.
    pub fn save_raw(&mut self, key: &str, bytes: Vec<u8>) {
        self.entries.insert(key.to_string(), bytes);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AttrStorage for MemoryAttrStorage {
    fn load(&self, key: &str) -> Result<Option<Attr>> {
        self.entries
            .get(key)
            .map(|bytes| self.parser.parse(bytes))
            .transpose()
    }

    fn save(&mut self, key: &str, attr: &Attr) -> Result<()> {
        let bytes = self.serializer.serialize(attr)?;
        tracing::trace!(key, len = bytes.len(), "storing attr");
        self.entries.insert(key.to_string(), bytes);
        Ok(())
    }

    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn stored_keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}
