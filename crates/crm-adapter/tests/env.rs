//! `CrmAdapter::from_env`. Kept in its own test binary since it mutates process env.

use crm_adapter::{AdapterError, CrmAdapter};
use serde_json::json;

#[test]
fn from_env_reads_token_and_portal_file() {
    std::env::remove_var("HUBSPOT_API_BASE");
    std::env::remove_var("HUBSPOT_REGISTRY_PATH");

    std::env::remove_var("HUBSPOT_ACCESS_TOKEN");
    assert!(matches!(
        CrmAdapter::from_env().err().unwrap(),
        AdapterError::Configuration(_)
    ));
    std::env::set_var("HUBSPOT_ACCESS_TOKEN", " \t ");
    assert!(matches!(
        CrmAdapter::from_env().err().unwrap(),
        AdapterError::Configuration(_)
    ));

    std::env::set_var("HUBSPOT_ACCESS_TOKEN", "  pat-na1-abc  ");
    let adapter = CrmAdapter::from_env().unwrap();
    assert!(adapter.objects("contact").is_ok());
    assert!(adapter.objects("pet").is_err());

    // The portal file only lists its custom type; `contact` comes from the standard registry.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("acme_api.json");
    let file = json!({
        "portal": "acme",
        "object_types": { "pet": "2-9" },
        "associations": {
            "pet": { "contact": { "pet_to_contact_owner": { "typeId": 91, "category": "USER_DEFINED" } } }
        }
    });
    std::fs::write(&path, file.to_string()).unwrap();
    std::env::set_var("HUBSPOT_REGISTRY_PATH", &path);
    std::env::set_var("HUBSPOT_API_BASE", "http://localhost:9/");

    let adapter = CrmAdapter::from_env().unwrap();
    assert_eq!(adapter.backend().api_base(), "http://localhost:9");
    assert_eq!(adapter.objects("pet").unwrap().type_id(), "2-9");
    assert_eq!(adapter.objects("deal").unwrap().type_id(), "0-3");
    assert!(adapter
        .registry()
        .associations
        .contains("pet", "contact", "pet_to_contact_owner"));
    assert_eq!(adapter.registry().portal.as_deref(), Some("acme"));

    std::env::set_var("HUBSPOT_REGISTRY_PATH", dir.path().join("missing.json"));
    assert!(matches!(
        CrmAdapter::from_env().err().unwrap(),
        AdapterError::Registry(_)
    ));

    std::env::remove_var("HUBSPOT_REGISTRY_PATH");
    std::env::remove_var("HUBSPOT_API_BASE");
    std::env::remove_var("HUBSPOT_ACCESS_TOKEN");
}
