//! (from type, to type, association name) -> association type id and category.

use crm_types::{AssociationCategory, AssociationLabelType, AssociationSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One registered association type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationDefinition {
    #[serde(rename = "typeId")]
    pub type_id: u32,
    pub category: AssociationCategory,
    /// Label as defined in the portal; `None` for unlabeled types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AssociationDefinition {
    pub fn new(type_id: u32, category: AssociationCategory) -> Self {
        Self {
            type_id,
            category,
            label: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Spec sent to the association-create endpoint.
    pub fn spec(&self) -> AssociationSpec {
        AssociationSpec {
            association_category: self.category,
            association_type_id: self.type_id,
        }
    }
}

impl From<AssociationLabelType> for AssociationDefinition {
    fn from(l: AssociationLabelType) -> Self {
        Self {
            type_id: l.type_id,
            category: l.category,
            label: l.label.filter(|s| !s.is_empty()),
        }
    }
}

type LabelMap = BTreeMap<String, AssociationDefinition>;

/// from type name -> to type name -> association name -> definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssociationRegistry {
    entries: BTreeMap<String, BTreeMap<String, LabelMap>>,
}

impl AssociationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous definition under the same key.
    pub fn insert(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        name: impl Into<String>,
        definition: AssociationDefinition,
    ) -> Option<AssociationDefinition> {
        self.entries
            .entry(from.into())
            .or_default()
            .entry(to.into())
            .or_default()
            .insert(name.into(), definition)
    }

    pub fn resolve(&self, from: &str, to: &str, name: &str) -> Option<&AssociationDefinition> {
        self.entries.get(from)?.get(to)?.get(name)
    }

    pub fn contains(&self, from: &str, to: &str, name: &str) -> bool {
        self.resolve(from, to, name).is_some()
    }

    /// Registered association names for a type pair, sorted.
    pub fn names(&self, from: &str, to: &str) -> Vec<&str> {
        self.entries
            .get(from)
            .and_then(|m| m.get(to))
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Destination types with at least one association registered from `from`.
    pub fn targets(&self, from: &str) -> Vec<&str> {
        self.entries
            .get(from)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Keep the associations for which `keep` returns true. Type pairs and source types left
    /// without associations are removed.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str, &str, &AssociationDefinition) -> bool,
    {
        for (from, tos) in self.entries.iter_mut() {
            for (to, names) in tos.iter_mut() {
                names.retain(|name, def| keep(from, to, name, def));
            }
            tos.retain(|_, names| !names.is_empty());
        }
        self.entries.retain(|_, tos| !tos.is_empty());
    }

    /// Total number of registered association names.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(|m| m.values())
            .map(|m| m.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str, &AssociationDefinition)> {
        self.entries.iter().flat_map(|(from, tos)| {
            tos.iter().flat_map(move |(to, names)| {
                names
                    .iter()
                    .map(move |(name, def)| (from.as_str(), to.as_str(), name.as_str(), def))
            })
        })
    }
}
