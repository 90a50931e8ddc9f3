use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Store is an interface for the key-value backing storage consulted for toggle values.
///
/// Ordinarily the only implementation in use is [crate::AppSettings], which reads the
/// application configuration. Tests substitute an in-memory [MapStore] or a closure wrapped
/// with [from_fn].
pub trait Store {
    /// Retrieve the raw value stored under `key`, or `None` if the key is not present.
    fn value(&self, key: &str) -> Option<String>;
}

impl<T: Store + ?Sized> Store for &T {
    fn value(&self, key: &str) -> Option<String> {
        (**self).value(key)
    }
}

impl<T: Store + ?Sized> Store for Box<T> {
    fn value(&self, key: &str) -> Option<String> {
        (**self).value(key)
    }
}

impl<T: Store + ?Sized> Store for Arc<T> {
    fn value(&self, key: &str) -> Option<String> {
        (**self).value(key)
    }
}

impl Store for HashMap<String, String> {
    fn value(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl Store for BTreeMap<String, String> {
    fn value(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// An owned in-memory store.
///
/// Deserializes from a flat object of string values, e.g. `{"Beta.Enabled": "true"}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MapStore {
    values: HashMap<String, String>,
}

impl MapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Store for MapStore {
    fn value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MapStore {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for MapStore {
    fn from(values: HashMap<String, String>) -> Self {
        MapStore { values }
    }
}

/// A store backed by a lookup function. Created with [from_fn].
#[derive(Clone)]
pub struct FnStore<F> {
    lookup: F,
}

impl<F> Store for FnStore<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn value(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }
}

impl<F> std::fmt::Debug for FnStore<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStore").finish_non_exhaustive()
    }
}

/// Adapt a lookup function into a [Store].
///
/// The function is called once per toggle query with the full key (e.g. `"Beta.Enabled"`). It
/// is not validated, and a panic raised inside it propagates to whoever made the query.
pub fn from_fn<F>(lookup: F) -> FnStore<F>
where
    F: Fn(&str) -> Option<String>,
{
    FnStore { lookup }
}
