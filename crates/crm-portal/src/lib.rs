//! Portal discovery: one registry file per configured HubSpot portal, plus a shared file
//! with what all of them define.

pub mod config;
pub mod sync;

pub use config::{PortalConfig, PortalEntry};
pub use sync::{registry_path, sync_portal, write_shared, PortalError, SyncOutcome, SHARED_PORTAL};
