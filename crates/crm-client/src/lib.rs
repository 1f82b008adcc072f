//! HubSpot CRM client.

mod hubspot;
#[cfg(feature = "test-util")]
pub mod mock;

pub use crm_types::{CrmBackend, CrmError, SchemaSource};
pub use hubspot::{HubspotClient, DEFAULT_API_BASE};

#[cfg(feature = "test-util")]
pub use mock::{MockCall, MockCrmBackend};
