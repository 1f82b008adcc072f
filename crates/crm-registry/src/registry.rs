//! Combined registry and its JSON portal file.

use crate::{
    association_name, AssociationDefinition, AssociationRegistry, ObjectTypeRegistry,
    PropertyDefinition, PropertyRegistry,
};
use crm_types::{AssociationLabelType, CrmError, ObjectSchema};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("registry json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("association {from} -> {to} references unregistered object type")]
    DanglingAssociation { from: String, to: String },
    #[error("properties listed for unregistered object type {0}")]
    DanglingProperties(String),
    #[error("discovery failed: {0}")]
    Discovery(#[from] CrmError),
}

/// Object-type and association registries for one portal.
///
/// Serialized as the portal file (`<portal>_api.json`):
/// `{ "portal": ..., "object_types": {name: id}, "associations": {from: {to: {name: def}}},
/// "properties": {name: {property: def}} }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal: Option<String>,
    #[serde(default)]
    pub object_types: ObjectTypeRegistry,
    #[serde(default)]
    pub associations: AssociationRegistry,
    #[serde(default, skip_serializing_if = "PropertyRegistry::is_empty")]
    pub properties: PropertyRegistry,
}

impl Registry {
    pub fn new(object_types: ObjectTypeRegistry, associations: AssociationRegistry) -> Self {
        Self {
            portal: None,
            object_types,
            associations,
            properties: PropertyRegistry::new(),
        }
    }

    /// Process-wide registry of HubSpot standard object types and default associations.
    pub fn standard() -> &'static Registry {
        crate::standard::standard()
    }

    /// Shared handle to the standard registry, for owners that hold an `Arc<Registry>`.
    pub fn shared_standard() -> Arc<Registry> {
        Arc::clone(crate::standard::standard())
    }

    /// Parse a portal file and check that every association endpoint is a registered type.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let registry: Registry = serde_json::from_str(json)?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn to_json_pretty(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading registry file");
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// This registry with the portal file at `path` merged over it. Only the merged result has
    /// to be consistent, so the file may reference types it does not list itself.
    pub fn merged_with_file(&self, path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "merging registry file");
        let overlay: Registry = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        let mut merged = self.clone();
        merged.extend(&overlay);
        merged.validate()?;
        Ok(merged)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "saving registry file");
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Add every entry of `other`, replacing entries under equal keys.
    pub fn extend(&mut self, other: &Registry) {
        for (name, id) in other.object_types.iter() {
            self.object_types.insert(name, id);
        }
        for (from, to, name, def) in other.associations.iter() {
            self.associations.insert(from, to, name, def.clone());
        }
        for (object_type, name, def) in other.properties.iter() {
            self.properties.insert(object_type, name, def.clone());
        }
        if other.portal.is_some() {
            self.portal = other.portal.clone();
        }
    }

    /// Registry shared by all of `portals`: the object types, association names and properties
    /// present in every one of them. Ids and definitions are taken from the first portal.
    /// Associations whose endpoints did not survive are dropped with them.
    pub fn intersect(portals: &[Registry]) -> Registry {
        let Some((first, rest)) = portals.split_first() else {
            return Registry::default();
        };
        let mut shared = first.clone();
        shared.portal = None;
        shared
            .object_types
            .retain(|name, _| rest.iter().all(|p| p.object_types.contains(name)));

        let object_types = &shared.object_types;
        shared.associations.retain(|from, to, name, _| {
            object_types.contains(from)
                && object_types.contains(to)
                && rest.iter().all(|p| p.associations.contains(from, to, name))
        });
        shared.properties.retain(|object_type, name, _| {
            object_types.contains(object_type)
                && rest.iter().all(|p| p.properties.get(object_type, name).is_some())
        });
        shared
    }

    /// Every association endpoint and every property owner must be a registered type.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (from, to, _, _) in self.associations.iter() {
            if !self.object_types.contains(from) || !self.object_types.contains(to) {
                return Err(RegistryError::DanglingAssociation {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }
        if let Some(owner) = self
            .properties
            .object_types()
            .find(|t| !self.object_types.contains(t))
        {
            return Err(RegistryError::DanglingProperties(owner.to_string()));
        }
        Ok(())
    }

    /// Build a registry from discovered schemas and association labels.
    ///
    /// `labels` holds `(from schema name, to schema name, label types)`. Type names are the
    /// lowercased schema names. Association names follow [`association_name`]; a name that is
    /// already taken for the pair gets a numeric suffix starting at `2`.
    pub fn from_discovery(
        portal: impl Into<String>,
        schemas: &[ObjectSchema],
        labels: &[(String, String, Vec<AssociationLabelType>)],
    ) -> Self {
        let mut object_types = ObjectTypeRegistry::new();
        let mut properties = PropertyRegistry::new();
        for schema in schemas {
            let name = schema.name.to_lowercase();
            for prop in &schema.properties {
                properties.insert(name.clone(), prop.name.clone(), PropertyDefinition::from(prop));
            }
            object_types.insert(name, schema.object_type_id.clone());
        }

        let mut associations = AssociationRegistry::new();
        for (from, to, types) in labels {
            let from = from.to_lowercase();
            let to = to.to_lowercase();
            for label_type in types {
                let base = association_name(&from, &to, label_type.label.as_deref());
                let mut name = base.clone();
                let mut suffix = 2;
                while associations.contains(&from, &to, &name) {
                    name = format!("{}{}", base, suffix);
                    suffix += 1;
                }
                associations.insert(
                    from.clone(),
                    to.clone(),
                    name,
                    AssociationDefinition::from(label_type.clone()),
                );
            }
        }

        Self {
            portal: Some(portal.into()),
            object_types,
            associations,
            properties,
        }
    }
}
