//! Core types and traits for the HubSpot CRM adapter.
//!
//! Wire DTOs mirror the HubSpot CRM v3 objects and v4 associations JSON shapes.

mod dto;
mod traits;

pub use dto::*;
pub use traits::*;
