//! Discovery config file.

use crate::PortalError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `{ "outfolder": "generated", "portals": [{ "name": "acme", "token": "pat-..." }] }`
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    pub outfolder: PathBuf,
    #[serde(alias = "schemas")]
    pub portals: Vec<PortalEntry>,
}

#[derive(Clone, Deserialize)]
pub struct PortalEntry {
    pub name: String,
    pub token: String,
}

impl std::fmt::Debug for PortalEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalEntry").field("name", &self.name).finish()
    }
}

impl PortalConfig {
    pub fn from_json(json: &str) -> Result<Self, PortalError> {
        let config: PortalConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PortalError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), PortalError> {
        if self.portals.is_empty() {
            return Err(PortalError::Config("no portals configured".to_string()));
        }
        for (i, p) in self.portals.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(PortalError::Config(format!("portal #{} has no name", i + 1)));
            }
            if p.name == crate::SHARED_PORTAL {
                return Err(PortalError::Config(format!(
                    "portal name {} is reserved for the shared registry",
                    p.name
                )));
            }
            if p.token.trim().is_empty() {
                return Err(PortalError::Config(format!("portal {} has no token", p.name)));
            }
        }
        Ok(())
    }
}
