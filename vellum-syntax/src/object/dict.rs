//! Dictionaries.

use crate::object::{FromObject, Name, Object};
use crate::xref::XRef;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// A dictionary, mapping names to objects.
#[derive(Clone, PartialEq, Default)]
pub struct Dict(Arc<FxHashMap<Name, Object>>);

impl Dict {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entries in the dictionary.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the dictionary contains an entry with the given key.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.0.contains_key(key)
    }

    /// Return the raw entry for a key, without resolving references.
    #[inline]
    pub fn get_raw(&self, key: &[u8]) -> Option<&Object> {
        self.0.get(key)
    }

    /// Return the entry for a key as a specific type, resolving references
    /// through the object store.
    #[inline]
    pub fn get<T: FromObject>(&self, key: &[u8], xref: &XRef) -> Option<T> {
        T::from_object(self.get_raw(key)?, xref)
    }

    /// Like [`Dict::get`], but tries several keys in order. Used for entries that
    /// have an abbreviated form, like the keys of inline images.
    pub fn get_any<T: FromObject>(&self, keys: &[&[u8]], xref: &XRef) -> Option<T> {
        keys.iter().find_map(|k| self.get(k, xref))
    }

    /// Like [`Dict::get_raw`], but tries several keys in order.
    pub fn get_raw_any(&self, keys: &[&[u8]]) -> Option<&Object> {
        keys.iter().find_map(|k| self.get_raw(k))
    }

    /// Insert an entry, replacing any existing entry with the same key.
    pub fn insert(&mut self, key: impl Into<Name>, value: impl Into<Object>) {
        Arc::make_mut(&mut self.0).insert(key.into(), value.into());
    }

    /// Builder-style variant of [`Dict::insert`].
    pub fn with(mut self, key: impl Into<Name>, value: impl Into<Object>) -> Self {
        self.insert(key, value);
        self
    }

    /// Iterate over all keys.
    pub fn keys(&self) -> impl Iterator<Item = &Name> {
        self.0.keys()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Object)> {
        self.0.iter()
    }
}

impl<K: Into<Name>> FromIterator<(K, Object)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, Object)>>(iter: I) -> Self {
        Self(Arc::new(
            iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }
}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = self.0.iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        f.debug_map().entries(entries).finish()
    }
}
