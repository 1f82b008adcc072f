//! Build a registry by introspecting a live portal.

use crate::{Registry, RegistryError};
use crm_types::{AssociationLabelType, ObjectSchema, SchemaSource};

/// Standard object types whose schemas are fetched individually; the custom-schema listing
/// only returns portal-defined objects.
pub const DEFAULT_SCHEMA_TYPES: &[&str] = &[
    "call",
    "cart",
    "communication",
    "company",
    "contact",
    "deal",
    "discount",
    "email",
    "engagement",
    "fee",
    "feedback_submission",
    "goal_target",
    "line_item",
    "marketing_event",
    "meeting_event",
    "note",
    "order",
    "postal_mail",
    "product",
    "quote",
    "quote_template",
    "task",
    "tax",
    "ticket",
];

/// Fetch every schema and the association labels between each ordered pair of distinct
/// schemas, then build the portal's registry.
pub async fn discover<S>(source: &S, portal: &str) -> Result<Registry, RegistryError>
where
    S: SchemaSource + ?Sized,
{
    tracing::info!(portal, "fetching custom schemas");
    let mut schemas: Vec<ObjectSchema> = source.custom_schemas().await?;
    tracing::info!(portal, count = schemas.len(), "custom schemas retrieved");

    let total = DEFAULT_SCHEMA_TYPES.len();
    for (i, object_type) in DEFAULT_SCHEMA_TYPES.iter().enumerate() {
        tracing::debug!(portal, object_type, "fetching schema {}/{}", i + 1, total);
        schemas.push(source.schema(object_type).await?);
    }

    let mut labels: Vec<(String, String, Vec<AssociationLabelType>)> = Vec::new();
    for (i, from) in schemas.iter().enumerate() {
        tracing::info!(
            portal,
            schema = %from.name,
            "fetching association labels {}/{}",
            i + 1,
            schemas.len()
        );
        for to in &schemas {
            if from.name == to.name {
                continue;
            }
            let found = source
                .association_labels(&from.object_type_id, &to.object_type_id)
                .await?;
            if found.is_empty() {
                continue;
            }
            labels.push((from.name.clone(), to.name.clone(), found));
        }
    }

    let registry = Registry::from_discovery(portal, &schemas, &labels);
    tracing::info!(
        portal,
        object_types = registry.object_types.len(),
        associations = registry.associations.len(),
        "registry built"
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crm_types::{AssociationCategory, CrmError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakePortal {
        label_calls: AtomicUsize,
    }

    fn schema(name: &str, id: &str) -> ObjectSchema {
        serde_json::from_value(json!({ "name": name, "objectTypeId": id })).unwrap()
    }

    fn standard_id(name: &str) -> String {
        let pos = DEFAULT_SCHEMA_TYPES.iter().position(|t| *t == name).unwrap();
        format!("0-{}", pos + 100)
    }

    #[async_trait]
    impl SchemaSource for FakePortal {
        async fn custom_schemas(&self) -> Result<Vec<ObjectSchema>, CrmError> {
            Ok(vec![schema("pet", "2-1")])
        }

        async fn schema(&self, object_type: &str) -> Result<ObjectSchema, CrmError> {
            Ok(schema(object_type, &standard_id(object_type)))
        }

        async fn association_labels(
            &self,
            from: &str,
            to: &str,
        ) -> Result<Vec<AssociationLabelType>, CrmError> {
            self.label_calls.fetch_add(1, Ordering::SeqCst);
            if from == "2-1" && to == standard_id("contact") {
                return Ok(vec![AssociationLabelType {
                    category: AssociationCategory::UserDefined,
                    type_id: 55,
                    label: Some("Owner".to_string()),
                }]);
            }
            Ok(vec![])
        }
    }

    struct BrokenPortal;

    #[async_trait]
    impl SchemaSource for BrokenPortal {
        async fn custom_schemas(&self) -> Result<Vec<ObjectSchema>, CrmError> {
            Err(CrmError::Api {
                status: 401,
                message: "expired token".to_string(),
                category: None,
                correlation_id: None,
            })
        }

        async fn schema(&self, _object_type: &str) -> Result<ObjectSchema, CrmError> {
            unreachable!()
        }

        async fn association_labels(
            &self,
            _from: &str,
            _to: &str,
        ) -> Result<Vec<AssociationLabelType>, CrmError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn discovers_types_and_labels() {
        let portal = FakePortal {
            label_calls: AtomicUsize::new(0),
        };
        let reg = discover(&portal, "acme").await.unwrap();

        let n = DEFAULT_SCHEMA_TYPES.len() + 1;
        assert_eq!(reg.object_types.len(), n);
        assert_eq!(portal.label_calls.load(Ordering::SeqCst), n * (n - 1));
        assert_eq!(reg.object_types.resolve("pet"), Some("2-1"));
        let def = reg
            .associations
            .resolve("pet", "contact", "pet_to_contact_owner")
            .unwrap();
        assert_eq!(def.type_id, 55);
        assert_eq!(reg.associations.len(), 1);
    }

    #[tokio::test]
    async fn discovery_surfaces_service_errors() {
        let err = discover(&BrokenPortal, "acme").await.unwrap_err();
        match err {
            RegistryError::Discovery(e) => assert!(e.is_unauthorized()),
            other => panic!("unexpected error: {}", other),
        }
    }
}
