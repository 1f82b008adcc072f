//! Read-only registries mapping logical CRM names to service identifiers.
//!
//! `ObjectTypeRegistry` maps a type name (`contact`) to its type id (`0-1`);
//! `AssociationRegistry` maps (from, to, association name) to an association type id and
//! category; `PropertyRegistry` holds the discovered properties of each type.
//! `Registry::standard()` is the process-wide registry of HubSpot standard objects.

mod associations;
mod discovery;
mod label;
mod object_types;
mod properties;
mod registry;
mod standard;

pub use associations::{AssociationDefinition, AssociationRegistry};
pub use discovery::{discover, DEFAULT_SCHEMA_TYPES};
pub use label::{association_name, sanitize_label};
pub use object_types::ObjectTypeRegistry;
pub use properties::{PropertyDefinition, PropertyRegistry};
pub use registry::{Registry, RegistryError};
