//! CrmAdapter: binds one backend handle to the read-only registries.

use crate::{AdapterError, CrmObject, ObjectAccessor, TypedObject};
use crm_client::HubspotClient;
use crm_registry::Registry;
use crm_types::CrmBackend;
use std::sync::Arc;

/// Factory for per-object-type accessors. Owns its backend handle exclusively.
pub struct CrmAdapter<B> {
    backend: B,
    registry: Arc<Registry>,
}

impl CrmAdapter<HubspotClient> {
    /// HubSpot-backed adapter over the standard registry.
    /// Fails with `Configuration` when the credential is missing or blank.
    pub fn from_credential(credential: Option<&str>) -> Result<Self, AdapterError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AdapterError::Configuration("no token provided".to_string()))?;
        Ok(Self::new(
            HubspotClient::new(token),
            Registry::shared_standard(),
        ))
    }

    /// Create from environment variables:
    /// `HUBSPOT_ACCESS_TOKEN` (required), `HUBSPOT_API_BASE`, and `HUBSPOT_REGISTRY_PATH`
    /// (a portal file merged over the standard registry; it may reference standard types
    /// without listing them).
    pub fn from_env() -> Result<Self, AdapterError> {
        let client = HubspotClient::from_env().ok_or_else(|| {
            AdapterError::Configuration("HUBSPOT_ACCESS_TOKEN is not set".to_string())
        })?;
        let registry = match std::env::var("HUBSPOT_REGISTRY_PATH") {
            Ok(path) => {
                let registry = Registry::standard().merged_with_file(&path)?;
                tracing::info!(
                    path = %path,
                    object_types = registry.object_types.len(),
                    associations = registry.associations.len(),
                    "loaded portal registry"
                );
                Arc::new(registry)
            }
            Err(_) => Registry::shared_standard(),
        };
        Ok(Self::new(client, registry))
    }
}

impl<B: CrmBackend> CrmAdapter<B> {
    pub fn new(backend: B, registry: Arc<Registry>) -> Self {
        Self { backend, registry }
    }

    /// Adapter over the process-wide standard registry.
    pub fn with_standard_registry(backend: B) -> Self {
        Self::new(backend, Registry::shared_standard())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Accessor bound to `object_type`. Fails fast if the type is not registered.
    pub fn objects(&self, object_type: &str) -> Result<ObjectAccessor<'_, B>, AdapterError> {
        let type_id = self.resolve_type(object_type)?;
        Ok(ObjectAccessor::new(self, object_type, type_id))
    }

    /// Typed accessor for `T`. Fails fast if `T::TYPE_NAME` is not registered.
    pub fn object<T: CrmObject>(&self) -> Result<TypedObject<'_, B, T>, AdapterError> {
        Ok(TypedObject::new(self.objects(T::TYPE_NAME)?))
    }

    pub(crate) fn resolve_type(&self, object_type: &str) -> Result<&str, AdapterError> {
        self.registry
            .object_types
            .resolve(object_type)
            .ok_or_else(|| AdapterError::UnknownObjectType(object_type.to_string()))
    }
}
