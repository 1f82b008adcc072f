//! Object type name -> property name -> property definition, as discovered from schemas.

use crm_types::{PropertyOption, SchemaProperty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One property of an object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// HubSpot value type: `string`, `number`, `enumeration`, `datetime`, ...
    #[serde(rename = "type", default)]
    pub value_type: String,
    /// Allowed values of an enumeration property.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
}

impl PropertyDefinition {
    pub fn is_enumeration(&self) -> bool {
        self.value_type == "enumeration"
    }
}

impl From<&SchemaProperty> for PropertyDefinition {
    fn from(p: &SchemaProperty) -> Self {
        Self {
            label: p.label.clone(),
            value_type: p.value_type.clone(),
            options: p.options.clone(),
        }
    }
}

type PropertyMap = BTreeMap<String, PropertyDefinition>;

/// Properties per object type. Types discovered without a schema have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyRegistry {
    entries: BTreeMap<String, PropertyMap>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous definition.
    pub fn insert(
        &mut self,
        object_type: impl Into<String>,
        name: impl Into<String>,
        definition: PropertyDefinition,
    ) -> Option<PropertyDefinition> {
        self.entries
            .entry(object_type.into())
            .or_default()
            .insert(name.into(), definition)
    }

    pub fn get(&self, object_type: &str, name: &str) -> Option<&PropertyDefinition> {
        self.entries.get(object_type)?.get(name)
    }

    /// Property names of `object_type`, sorted; empty when the type has no entry.
    pub fn names(&self, object_type: &str) -> Vec<&str> {
        self.entries
            .get(object_type)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Object types with at least one property.
    pub fn object_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keep the properties for which `keep` returns true; types left without properties are
    /// removed.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str, &PropertyDefinition) -> bool,
    {
        for (object_type, props) in self.entries.iter_mut() {
            props.retain(|name, def| keep(object_type, name, def));
        }
        self.entries.retain(|_, props| !props.is_empty());
    }

    /// Number of object types with properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &PropertyDefinition)> {
        self.entries.iter().flat_map(|(object_type, props)| {
            props
                .iter()
                .map(move |(name, def)| (object_type.as_str(), name.as_str(), def))
        })
    }
}
