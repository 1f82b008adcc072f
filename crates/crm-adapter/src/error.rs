use crm_registry::RegistryError;
use crm_types::CrmError;

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Missing or unusable configuration at construction.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Object type not present in the object-type registry.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// Association name not registered for the (from, to) type pair.
    #[error("invalid association type {label:?} from {from} to {to}")]
    InvalidAssociation {
        from: String,
        to: String,
        label: String,
    },

    /// Whatever the CRM service or transport reported, unaltered.
    #[error(transparent)]
    Backend(#[from] CrmError),

    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}

impl AdapterError {
    /// The service error, when the failure came from the backend.
    pub fn backend(&self) -> Option<&CrmError> {
        match self {
            AdapterError::Backend(e) => Some(e),
            _ => None,
        }
    }
}
