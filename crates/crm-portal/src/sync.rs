//! Load or discover one portal's registry file.

use crm_registry::{discover, Registry, RegistryError};
use crm_types::SchemaSource;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Where the registry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// An existing registry file was reused.
    Loaded,
    /// The portal was introspected and the file (re)written.
    Discovered,
}

/// Name of the registry file shared by every configured portal.
pub const SHARED_PORTAL: &str = "shared";

/// `<outfolder>/<portal>_api.json`
pub fn registry_path(outfolder: &Path, portal: &str) -> PathBuf {
    outfolder.join(format!("{}_api.json", portal))
}

/// Reuse the portal's registry file if present (unless `refresh`), otherwise discover the
/// portal through `source` and write the file.
pub async fn sync_portal<S>(
    source: &S,
    portal: &str,
    outfolder: &Path,
    refresh: bool,
) -> Result<(Registry, SyncOutcome), PortalError>
where
    S: SchemaSource + ?Sized,
{
    let path = registry_path(outfolder, portal);
    if !refresh && tokio::fs::try_exists(&path).await? {
        tracing::info!(portal, path = %path.display(), "loading registry file");
        let content = tokio::fs::read_to_string(&path).await?;
        return Ok((Registry::from_json(&content)?, SyncOutcome::Loaded));
    }

    tracing::info!(portal, "discovering portal");
    let registry = discover(source, portal).await?;
    tokio::fs::create_dir_all(outfolder).await?;
    tokio::fs::write(&path, registry.to_json_pretty()?).await?;
    tracing::info!(portal, path = %path.display(), "registry file written");
    Ok((registry, SyncOutcome::Discovered))
}

/// Write `<outfolder>/shared_api.json` holding what every one of `registries` defines.
pub async fn write_shared(
    registries: &[Registry],
    outfolder: &Path,
) -> Result<Registry, PortalError> {
    let mut shared = Registry::intersect(registries);
    shared.portal = Some(SHARED_PORTAL.to_string());
    let path = registry_path(outfolder, SHARED_PORTAL);
    tokio::fs::create_dir_all(outfolder).await?;
    tokio::fs::write(&path, shared.to_json_pretty()?).await?;
    tracing::info!(
        portals = registries.len(),
        object_types = shared.object_types.len(),
        associations = shared.associations.len(),
        path = %path.display(),
        "shared registry written"
    );
    Ok(shared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crm_types::{AssociationLabelType, CrmError, ObjectSchema};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn shared_file_holds_the_intersection() {
        let dir = tempfile::tempdir().unwrap();
        let mut alpha = Registry::standard().clone();
        alpha.object_types.insert("pet", "2-1");
        let beta = Registry::standard().clone();

        let shared = write_shared(&[alpha, beta.clone()], dir.path()).await.unwrap();

        assert_eq!(shared.portal.as_deref(), Some(SHARED_PORTAL));
        assert!(!shared.object_types.contains("pet"));
        assert_eq!(shared.associations, beta.associations);
        let written = std::fs::read_to_string(dir.path().join("shared_api.json")).unwrap();
        assert_eq!(Registry::from_json(&written).unwrap(), shared);
    }

    #[derive(Default)]
    struct CountingPortal {
        schema_calls: AtomicUsize,
    }

    #[async_trait]
    impl SchemaSource for CountingPortal {
        async fn custom_schemas(&self) -> Result<Vec<ObjectSchema>, CrmError> {
            Ok(vec![])
        }

        async fn schema(&self, object_type: &str) -> Result<ObjectSchema, CrmError> {
            let n = self.schema_calls.fetch_add(1, Ordering::SeqCst);
            serde_json::from_value(serde_json::json!({
                "name": object_type,
                "objectTypeId": format!("0-{}", n)
            }))
            .map_err(|e| CrmError::Parse(e.to_string()))
        }

        async fn association_labels(
            &self,
            _from: &str,
            _to: &str,
        ) -> Result<Vec<AssociationLabelType>, CrmError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn second_sync_reuses_file_unless_refreshed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("generated");
        let portal = CountingPortal::default();

        let (first, outcome) = sync_portal(&portal, "acme", &out, false).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Discovered);
        assert!(registry_path(&out, "acme").exists());
        let calls = portal.schema_calls.load(Ordering::SeqCst);

        let (second, outcome) = sync_portal(&portal, "acme", &out, false).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Loaded);
        assert_eq!(second, first);
        assert_eq!(portal.schema_calls.load(Ordering::SeqCst), calls);

        let (_, outcome) = sync_portal(&portal, "acme", &out, true).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Discovered);
        assert_eq!(portal.schema_calls.load(Ordering::SeqCst), calls * 2);
    }
}
