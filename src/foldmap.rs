//! Maps keyed by casemapped names.


use crate::casemap::Casemap;
use std::collections::{hash_map, HashMap};

#[derive(Clone, Debug)]
struct Entry<V> {
    key: String,
    value: V,
}

/// A map from names to values where name equality is decided by a [`Casemap`].
///
/// Entries are indexed by the canonical form of their name,
/// but remember the spelling they were first inserted with,
/// which is available through [`original_key`][FoldMap::original_key].
///
/// The casemap can be replaced at any time using [`set_casemap`][FoldMap::set_casemap],
/// which re-indexes every entry.
/// Iteration order is unspecified.
#[derive(Clone, Debug)]
pub struct FoldMap<V> {
    inner: HashMap<String, Entry<V>>,
    casemap: Casemap,
}

impl<V> Default for FoldMap<V> {
    fn default() -> Self {
        FoldMap::new()
    }
}

impl<V> FoldMap<V> {
    /// Creates an empty map that uses [`Casemap::None`].
    pub fn new() -> Self {
        FoldMap::with_casemap(Casemap::None)
    }
    /// Creates an empty map that uses the provided casemap.
    pub fn with_casemap(casemap: Casemap) -> Self {
        FoldMap { inner: HashMap::new(), casemap }
    }
    /// Returns the casemap used by this map.
    pub fn casemap(&self) -> Casemap {
        self.casemap
    }
    /// Returns `true` if there is an entry for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&*self.casemap.map(name))
    }
    /// Returns the spelling `name`'s entry was first inserted with.
    pub fn original_key(&self, name: &str) -> Option<&str> {
        self.inner.get(&*self.casemap.map(name)).map(|e| e.key.as_str())
    }
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
    /// Returns a reference to the value for `name`.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.inner.get(&*self.casemap.map(name)).map(|e| &e.value)
    }
    /// Returns a mutable reference to the value for `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.inner.get_mut(&*self.casemap.map(name)).map(|e| &mut e.value)
    }
    /// Returns the original key and the value for `name`.
    pub fn get_key_value(&self, name: &str) -> Option<(&str, &V)> {
        self.inner.get(&*self.casemap.map(name)).map(|e| (e.key.as_str(), &e.value))
    }
    /// Sets the value for `name`, returning the old value if there was one.
    ///
    /// If an entry already exists, only its value is replaced.
    /// The spelling it was first inserted with is kept as its original key.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        let name = name.into();
        let folded = self.casemap.map(&name).into_owned();
        match self.inner.entry(folded) {
            hash_map::Entry::Occupied(mut e) => {
                Some(std::mem::replace(&mut e.get_mut().value, value))
            }
            hash_map::Entry::Vacant(e) => {
                e.insert(Entry { key: name, value });
                None
            }
        }
    }
    /// Returns a mutable reference to the value for `name`,
    /// inserting the result of `f` if there is none.
    pub fn get_or_insert_with(
        &mut self,
        name: impl Into<String>,
        f: impl FnOnce() -> V,
    ) -> &mut V {
        let name = name.into();
        let folded = self.casemap.map(&name).into_owned();
        &mut self.inner.entry(folded).or_insert_with(|| Entry { key: name, value: f() }).value
    }
    /// Removes the entry for `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.remove_entry(name).map(|(_, v)| v)
    }
    /// Removes the entry for `name`, returning its original key and value.
    pub fn remove_entry(&mut self, name: &str) -> Option<(String, V)> {
        self.inner.remove(&*self.casemap.map(name)).map(|e| (e.key, e.value))
    }
    /// Moves the entry for `old` to `new`, replacing any entry `new` already had.
    ///
    /// Unlike [`insert`][FoldMap::insert], the original key becomes `new`.
    /// Returns `false` if there was no entry for `old`.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> bool {
        let Some(Entry { value, .. }) = self.inner.remove(&*self.casemap.map(old)) else {
            return false;
        };
        let key = new.into();
        let folded = self.casemap.map(&key).into_owned();
        self.inner.insert(folded, Entry { key, value });
        true
    }
    /// Replaces the casemap and re-indexes every entry under it.
    ///
    /// Entries whose original keys fold to the same name under the new casemap collide.
    /// Only one of them is kept; which one is unspecified.
    pub fn set_casemap(&mut self, casemap: Casemap) {
        self.casemap = casemap;
        let capacity = self.inner.len();
        let old = std::mem::replace(&mut self.inner, HashMap::with_capacity(capacity));
        for entry in old.into_values() {
            let folded = casemap.map(&entry.key).into_owned();
            if let Some(_dropped) = self.inner.insert(folded, entry) {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target: "lichen",
                    "entry {:?} collided with another under casemapping {} and was dropped",
                    _dropped.key,
                    casemap
                );
            }
        }
    }
    /// Removes every entry. Keeps the casemap.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(&str, &mut V) -> bool) {
        self.inner.retain(|_, e| f(&e.key, &mut e.value));
    }
    /// Iterates over original keys and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.inner.values().map(|e| (e.key.as_str(), &e.value))
    }
    /// Iterates over original keys and mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> + '_ {
        self.inner.values_mut().map(|e| (e.key.as_str(), &mut e.value))
    }
    /// Iterates over original keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.values().map(|e| e.key.as_str())
    }
    /// Iterates over values.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.inner.values().map(|e| &e.value)
    }
    /// Iterates over mutable values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.inner.values_mut().map(|e| &mut e.value)
    }
}
