//! Logical object-type name -> service object type id.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps type names such as `contact` to HubSpot object type ids such as `0-1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectTypeRegistry {
    ids: BTreeMap<String, String>,
}

impl ObjectTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, type_id: impl Into<String>) -> Self {
        self.insert(name, type_id);
        self
    }

    /// Insert or replace; returns the previous id for `name`.
    pub fn insert(&mut self, name: impl Into<String>, type_id: impl Into<String>) -> Option<String> {
        self.ids.insert(name.into(), type_id.into())
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// Keep the entries for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.ids.retain(|name, id| keep(name, id));
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
