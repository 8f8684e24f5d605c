//! Canonical sets
//!
//! The Compute API returns ordered lists for fields the declarative model
//! treats as unordered sets (network tags, scopes, node affinity values).
//! [`CanonicalSet`] stores members under a stable key chosen by a
//! [`SetStrategy`], so equality ignores order and duplicates.

use crate::resource::registry::canonicalize_scope;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Chooses the identity of a set member
pub trait SetStrategy<T> {
    type Key: Ord + Clone + fmt::Debug;

    fn key(value: &T) -> Self::Key;
}

/// Members are their own key
#[derive(Debug, Clone, Copy, Default)]
pub struct Natural;

impl<T: Ord + Clone + fmt::Debug> SetStrategy<T> for Natural {
    type Key = T;

    fn key(value: &T) -> T {
        value.clone()
    }
}

/// OAuth scopes keyed by their canonical URI, so an alias and its expansion collide
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeKey;

impl SetStrategy<String> for ScopeKey {
    type Key = String;

    fn key(value: &String) -> String {
        canonicalize_scope(value)
    }
}

/// Order-independent, duplicate-free collection
pub struct CanonicalSet<T, S: SetStrategy<T> = Natural> {
    items: BTreeMap<S::Key, T>,
    _strategy: PhantomData<S>,
}

impl<T, S: SetStrategy<T>> CanonicalSet<T, S> {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            _strategy: PhantomData,
        }
    }

    /// Insert a member. Returns false when an equal member was already present;
    /// the first inserted value is kept.
    pub fn insert(&mut self, value: T) -> bool {
        let key = S::key(&value);
        if self.items.contains_key(&key) {
            return false;
        }
        self.items.insert(key, value);
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains_key(&S::key(value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Members in key order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items.into_values().collect()
    }
}

impl<T: Clone, S: SetStrategy<T>> CanonicalSet<T, S> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }
}

impl<T, S: SetStrategy<T>> Default for CanonicalSet<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, S: SetStrategy<T>> Clone for CanonicalSet<T, S> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            _strategy: PhantomData,
        }
    }
}

impl<T: fmt::Debug, S: SetStrategy<T>> fmt::Debug for CanonicalSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.values()).finish()
    }
}

impl<T, S: SetStrategy<T>> PartialEq for CanonicalSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.items.keys().eq(other.items.keys())
    }
}

impl<T, S: SetStrategy<T>> Eq for CanonicalSet<T, S> {}

impl<T, S: SetStrategy<T>> PartialOrd for CanonicalSet<T, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, S: SetStrategy<T>> Ord for CanonicalSet<T, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.items.keys().cmp(other.items.keys())
    }
}

impl<T, S: SetStrategy<T>> FromIterator<T> for CanonicalSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<'a, T, S: SetStrategy<T>> IntoIterator for &'a CanonicalSet<T, S> {
    type Item = &'a T;
    type IntoIter = std::collections::btree_map::Values<'a, S::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl<T: Serialize, S: SetStrategy<T>> Serialize for CanonicalSet<T, S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.items.values())
    }
}

impl<'de, T: Deserialize<'de>, S: SetStrategy<T>> Deserialize<'de> for CanonicalSet<T, S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        let given = values.len();
        let set: Self = values.into_iter().collect();
        if set.len() < given {
            tracing::debug!("collapsed {} duplicate set members", given - set.len());
        }
        Ok(set)
    }
}

/// Shorthand for building a string set
pub fn string_set<I, V>(values: I) -> CanonicalSet<String>
where
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
