//! ObjectAccessor: the per-object-type get/create/update/association functions.

use crate::{AdapterError, CrmAdapter};
use crm_types::{
    AssociationPage, CrmBackend, ObjectCreateInput, ObjectUpdateInput, PropertyBag,
    PropertyWithHistory, OBJECT_ID_PROPERTY,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Empty acknowledgement returned by `update`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAck {}

/// Accessor bound to one registered object type. Each call is one backend request.
pub struct ObjectAccessor<'a, B> {
    adapter: &'a CrmAdapter<B>,
    object_type: String,
    type_id: String,
}

impl<'a, B: CrmBackend> ObjectAccessor<'a, B> {
    pub(crate) fn new(adapter: &'a CrmAdapter<B>, object_type: &str, type_id: &str) -> Self {
        Self {
            adapter,
            object_type: object_type.to_string(),
            type_id: type_id.to_string(),
        }
    }

    /// Logical type name (e.g. `contact`).
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Service type id (e.g. `0-1`).
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Fetch the requested properties of one record. The result holds only requested keys;
    /// properties the service reports as unset are omitted.
    pub async fn get<S: AsRef<str>>(
        &self,
        object_id: &str,
        properties: &[S],
    ) -> Result<PropertyBag, AdapterError> {
        tracing::debug!(object_type = %self.object_type, object_id, "get");
        let requested = owned(properties);
        let record = self
            .adapter
            .backend()
            .get_by_id(&self.type_id, object_id, &requested, &[])
            .await?;
        Ok(record.pick(&requested))
    }

    /// Fetch the requested properties with their value history.
    pub async fn get_with_history<S: AsRef<str>>(
        &self,
        object_id: &str,
        properties: &[S],
    ) -> Result<BTreeMap<String, PropertyWithHistory>, AdapterError> {
        tracing::debug!(object_type = %self.object_type, object_id, "get with history");
        let requested = owned(properties);
        let record = self
            .adapter
            .backend()
            .get_by_id(&self.type_id, object_id, &requested, &requested)
            .await?;
        Ok(requested
            .iter()
            .map(|p| {
                let entry = PropertyWithHistory {
                    value: record.property(p).map(str::to_string),
                    history: record.history(p).to_vec(),
                };
                (p.clone(), entry)
            })
            .collect())
    }

    /// Create a record. Returns the input properties the service echoed back, plus
    /// `hs_object_id` set to the new record id.
    pub async fn create(&self, properties: &PropertyBag) -> Result<PropertyBag, AdapterError> {
        tracing::debug!(object_type = %self.object_type, "create");
        let input = ObjectCreateInput {
            properties: properties.clone(),
            associations: Vec::new(),
        };
        let record = self.adapter.backend().create(&self.type_id, &input).await?;

        let keys: Vec<&String> = properties.keys().collect();
        let mut out = record.pick(&keys);
        out.insert(OBJECT_ID_PROPERTY.to_string(), record.id);
        Ok(out)
    }

    /// Partially update a record. No concurrency check.
    pub async fn update(
        &self,
        object_id: &str,
        properties: &PropertyBag,
    ) -> Result<UpdateAck, AdapterError> {
        tracing::debug!(object_type = %self.object_type, object_id, "update");
        let input = ObjectUpdateInput {
            properties: properties.clone(),
        };
        self.adapter
            .backend()
            .update(&self.type_id, object_id, &input)
            .await?;
        Ok(UpdateAck {})
    }

    /// First page of `to_type` records associated with `from_id`, with association labels.
    /// No auto-pagination: `paging.next` is left for the caller.
    pub async fn list_associations(
        &self,
        from_id: &str,
        to_type: &str,
    ) -> Result<AssociationPage, AdapterError> {
        let to_type_id = self.adapter.resolve_type(to_type)?;
        tracing::debug!(object_type = %self.object_type, from_id, to_type, "list associations");
        Ok(self
            .adapter
            .backend()
            .get_association_page(&self.type_id, from_id, to_type_id)
            .await?)
    }

    /// Associate `from_id` with `to_id` using the association registered under `label` for
    /// (this type, `to_type`). Unknown types and labels fail before any request is made.
    pub async fn associate(
        &self,
        from_id: &str,
        to_id: &str,
        to_type: &str,
        label: &str,
    ) -> Result<(), AdapterError> {
        let to_type_id = self.adapter.resolve_type(to_type)?;
        let definition = self
            .adapter
            .registry()
            .associations
            .resolve(&self.object_type, to_type, label)
            .ok_or_else(|| AdapterError::InvalidAssociation {
                from: self.object_type.clone(),
                to: to_type.to_string(),
                label: label.to_string(),
            })?;
        tracing::debug!(
            object_type = %self.object_type,
            from_id,
            to_type,
            to_id,
            type_id = definition.type_id,
            "associate"
        );
        self.adapter
            .backend()
            .create_association(&self.type_id, from_id, to_type_id, to_id, &[definition.spec()])
            .await?;
        Ok(())
    }
}

fn owned<S: AsRef<str>>(properties: &[S]) -> Vec<String> {
    properties.iter().map(|p| p.as_ref().to_string()).collect()
}
