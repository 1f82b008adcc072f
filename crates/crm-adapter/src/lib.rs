//! CRUD and association accessors over a CRM backend, keyed by object type.
//!
//! ```no_run
//! # async fn run() -> Result<(), crm_adapter::AdapterError> {
//! use crm_adapter::{objects::{Contact, ContactProperty}, CrmAdapter};
//!
//! let adapter = CrmAdapter::from_credential(Some("pat-na1-..."))?;
//! let contact = adapter
//!     .object::<Contact>()?
//!     .get("51", &[ContactProperty::Email, ContactProperty::FirstName])
//!     .await?;
//! println!("{:?}", contact.get(ContactProperty::Email));
//! # Ok(())
//! # }
//! ```

mod accessor;
mod adapter;
mod error;
pub mod objects;
mod typed;

pub use accessor::{ObjectAccessor, UpdateAck};
pub use adapter::CrmAdapter;
pub use error::AdapterError;
pub use typed::{CrmObject, Draft, PropertyName, Record, TypedObject};

pub use crm_registry::{AssociationDefinition, Registry};
pub use crm_types::{
    AssociationPage, CrmBackend, CrmError, PropertyBag, PropertyWithHistory, OBJECT_ID_PROPERTY,
};
