//! Traits for the CRM backend and schema discovery.

use crate::{
    AssociationLabelType, AssociationPage, AssociationSpec, ObjectCreateInput, ObjectRecord,
    ObjectSchema, ObjectUpdateInput,
};
use async_trait::async_trait;

/// Object and association operations of the CRM service.
///
/// All type arguments are service type identifiers (e.g. `0-1`), not logical names; the
/// adapter resolves names through its registries before calling in.
#[async_trait]
pub trait CrmBackend: Send + Sync {
    /// Fetch one record. `properties_with_history` may be empty.
    async fn get_by_id(
        &self,
        object_type: &str,
        object_id: &str,
        properties: &[String],
        properties_with_history: &[String],
    ) -> Result<ObjectRecord, CrmError>;

    /// Create one record.
    async fn create(
        &self,
        object_type: &str,
        input: &ObjectCreateInput,
    ) -> Result<ObjectRecord, CrmError>;

    /// Partially update one record.
    async fn update(
        &self,
        object_type: &str,
        object_id: &str,
        input: &ObjectUpdateInput,
    ) -> Result<ObjectRecord, CrmError>;

    /// First page of records of `to_object_type` associated with the given record.
    async fn get_association_page(
        &self,
        from_object_type: &str,
        object_id: &str,
        to_object_type: &str,
    ) -> Result<AssociationPage, CrmError>;

    /// Associate two records with the given association types.
    async fn create_association(
        &self,
        from_object_type: &str,
        from_object_id: &str,
        to_object_type: &str,
        to_object_id: &str,
        specs: &[AssociationSpec],
    ) -> Result<(), CrmError>;
}

/// Portal introspection used to build registries.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Schemas of all custom objects in the portal.
    async fn custom_schemas(&self) -> Result<Vec<ObjectSchema>, CrmError>;

    /// Schema of one object type (standard name such as `contact`, or a type id).
    async fn schema(&self, object_type: &str) -> Result<ObjectSchema, CrmError>;

    /// Association types defined from one object type id to another.
    async fn association_labels(
        &self,
        from_object_type_id: &str,
        to_object_type_id: &str,
    ) -> Result<Vec<AssociationLabelType>, CrmError>;
}

/// Failure reported by the CRM service or the transport to it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CrmError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        category: Option<String>,
        correlation_id: Option<String>,
    },
    #[error("parse error: {0}")]
    Parse(String),
}

impl CrmError {
    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            CrmError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}
