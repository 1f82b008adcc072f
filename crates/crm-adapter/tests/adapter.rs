//! Adapter behaviour against the in-memory mock backend.

use crm_adapter::objects::{Company, CompanyProperty, Contact, ContactProperty, Deal, DealProperty};
use crm_adapter::{AdapterError, CrmAdapter, Draft, PropertyBag, Registry, UpdateAck};
use crm_client::{MockCall, MockCrmBackend};
use crm_types::{AssociationCategory, AssociationLabelType, CrmError, ObjectSchema};
use std::sync::Arc;

fn adapter() -> (CrmAdapter<MockCrmBackend>, MockCrmBackend) {
    let mock = MockCrmBackend::new();
    (CrmAdapter::with_standard_registry(mock.clone()), mock)
}

fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn missing_credential_is_a_configuration_error() {
    for credential in [None, Some(""), Some("   ")] {
        let err = CrmAdapter::from_credential(credential).err().unwrap();
        assert!(matches!(err, AdapterError::Configuration(_)), "{:?}", credential);
    }
    assert!(CrmAdapter::from_credential(Some("pat-na1-abc")).is_ok());
}

#[tokio::test]
async fn get_returns_exactly_the_requested_subset() {
    let (adapter, mock) = adapter();
    mock.insert(
        "0-1",
        "51",
        [
            ("email", "ada@example.com"),
            ("firstname", "Ada"),
            ("lastname", "Lovelace"),
            ("phone", "555-0100"),
        ],
    )
    .await;

    let got = adapter
        .objects("contact")
        .unwrap()
        .get("51", &["email", "lastname", "company"])
        .await
        .unwrap();

    assert_eq!(got, bag(&[("email", "ada@example.com"), ("lastname", "Lovelace")]));
    assert_eq!(
        mock.calls().await,
        vec![MockCall::GetById {
            object_type: "0-1".to_string(),
            object_id: "51".to_string(),
            properties: vec!["email".into(), "lastname".into(), "company".into()],
            properties_with_history: vec![],
        }]
    );
}

#[tokio::test]
async fn create_echoes_input_and_adds_object_id() {
    let (adapter, mock) = adapter();
    let input = bag(&[("dealname", "Renewal"), ("amount", "1200")]);

    let created = adapter.objects("deal").unwrap().create(&input).await.unwrap();

    let id = created.get("hs_object_id").cloned().unwrap();
    let mut expected = input.clone();
    expected.insert("hs_object_id".to_string(), id.clone());
    assert_eq!(created, expected);
    assert!(!created.contains_key("createdate"));
    assert_eq!(mock.record("0-3", &id).await.unwrap()["dealname"], "Renewal");
    assert!(matches!(
        &mock.calls().await[0],
        MockCall::Create { association_count: 0, .. }
    ));
}

#[tokio::test]
async fn create_omits_input_keys_the_service_does_not_echo() {
    let (adapter, mock) = adapter();
    mock.read_only("hs_lead_status").await;
    let input = bag(&[
        ("email", "linus@example.com"),
        ("phone", ""),
        ("hs_lead_status", "NEW"),
    ]);

    let created = adapter.objects("contact").unwrap().create(&input).await.unwrap();

    let id = created.get("hs_object_id").cloned().unwrap();
    assert_eq!(
        created,
        bag(&[("email", "linus@example.com"), ("hs_object_id", id.as_str())])
    );
    let stored = mock.record("0-1", &id).await.unwrap();
    assert!(!stored.contains_key("phone"));
    assert!(!stored.contains_key("hs_lead_status"));
}

#[tokio::test]
async fn update_acknowledges_with_empty_value() {
    let (adapter, mock) = adapter();
    mock.insert("0-5", "42", [("subject", "Printer on fire")]).await;

    let ack = adapter
        .objects("ticket")
        .unwrap()
        .update("42", &bag(&[("hs_pipeline_stage", "4")]))
        .await
        .unwrap();

    assert_eq!(ack, UpdateAck::default());
    let stored = mock.record("0-5", "42").await.unwrap();
    assert_eq!(stored["hs_pipeline_stage"], "4");
    assert_eq!(stored["subject"], "Printer on fire");
}

#[tokio::test]
async fn every_registered_association_issues_one_create_call() {
    let registry = Registry::standard();
    for (from, to, name, def) in registry.associations.iter() {
        let (adapter, mock) = adapter();
        adapter
            .objects(from)
            .unwrap()
            .associate("100", "200", to, name)
            .await
            .unwrap();

        let calls = mock.calls().await;
        assert_eq!(calls.len(), 1, "{} -> {} ({})", from, to, name);
        match &calls[0] {
            MockCall::CreateAssociation {
                from_object_type,
                from_object_id,
                to_object_type,
                to_object_id,
                specs,
            } => {
                assert_eq!(Some(from_object_type.as_str()), registry.object_types.resolve(from));
                assert_eq!(Some(to_object_type.as_str()), registry.object_types.resolve(to));
                assert_eq!(from_object_id, "100");
                assert_eq!(to_object_id, "200");
                assert_eq!(specs, &vec![def.spec()]);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }
}

#[tokio::test]
async fn unregistered_label_fails_before_any_call() {
    let (adapter, mock) = adapter();
    let err = adapter
        .objects("contact")
        .unwrap()
        .associate("1", "2", "deal", "contact_to_deal_best_friend")
        .await
        .unwrap_err();

    match err {
        AdapterError::InvalidAssociation { from, to, label } => {
            assert_eq!(from, "contact");
            assert_eq!(to, "deal");
            assert_eq!(label, "contact_to_deal_best_friend");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(mock.calls().await.is_empty());
}

#[tokio::test]
async fn unknown_object_types_fail_fast() {
    let (adapter, mock) = adapter();
    assert!(matches!(
        adapter.objects("spaceship").err().unwrap(),
        AdapterError::UnknownObjectType(t) if t == "spaceship"
    ));

    let contacts = adapter.objects("contact").unwrap();
    let err = contacts.list_associations("1", "spaceship").await.unwrap_err();
    assert!(matches!(err, AdapterError::UnknownObjectType(_)));
    let err = contacts
        .associate("1", "2", "spaceship", "contact_to_spaceship")
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::UnknownObjectType(_)));
    assert!(mock.calls().await.is_empty());
}

#[tokio::test]
async fn list_associations_returns_one_page_verbatim() {
    let (adapter, _mock) = adapter();
    let contacts = adapter.objects("contact").unwrap();
    contacts
        .associate("51", "3001", "company", "contact_to_company")
        .await
        .unwrap();
    contacts
        .associate("51", "3001", "company", "contact_to_company_primary")
        .await
        .unwrap();

    let page = contacts.list_associations("51", "company").await.unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].to_object_id, "3001");
    let ids: Vec<u32> = page.results[0]
        .association_types
        .iter()
        .map(|t| t.type_id)
        .collect();
    assert_eq!(ids, vec![279, 1]);
    assert!(page.paging.is_none());
}

#[tokio::test]
async fn service_failures_pass_through_unaltered() {
    let (adapter, mock) = adapter();
    mock.fail_next(CrmError::Api {
        status: 429,
        message: "You have reached your secondly limit.".to_string(),
        category: Some("RATE_LIMITS".to_string()),
        correlation_id: None,
    })
    .await;

    let err = adapter
        .objects("company")
        .unwrap()
        .create(&bag(&[("name", "Acme")]))
        .await
        .unwrap_err();
    assert!(err.backend().unwrap().is_rate_limited());
    assert_eq!(err.to_string(), "API error 429: You have reached your secondly limit.");

    let err = adapter
        .objects("company")
        .unwrap()
        .get("does-not-exist", &["name"])
        .await
        .unwrap_err();
    assert!(err.backend().unwrap().is_not_found());
}

#[tokio::test]
async fn get_with_history_is_limited_to_requested_properties() {
    let (adapter, mock) = adapter();
    mock.insert("0-3", "9", [("dealstage", "closedwon"), ("amount", "10")])
        .await;

    let got = adapter
        .object::<Deal>()
        .unwrap()
        .get_with_history("9", &[DealProperty::Stage, DealProperty::CloseDate])
        .await
        .unwrap();

    assert_eq!(got.len(), 2);
    assert_eq!(got["dealstage"].value.as_deref(), Some("closedwon"));
    assert_eq!(got["dealstage"].history.len(), 1);
    assert_eq!(got["closedate"].value, None);
    assert!(got["closedate"].history.is_empty());
}

#[tokio::test]
async fn typed_accessors_round_trip() {
    let (adapter, mock) = adapter();
    let contacts = adapter.object::<Contact>().unwrap();

    let created = contacts
        .create(
            Draft::new()
                .set(ContactProperty::Email, "grace@example.com")
                .set(ContactProperty::FirstName, "Grace"),
        )
        .await
        .unwrap();
    let id = created.id().unwrap().to_string();
    assert_eq!(created.get(ContactProperty::Email), Some("grace@example.com"));

    contacts
        .update(&id, Draft::new().set(ContactProperty::LastName, "Hopper"))
        .await
        .unwrap();
    let fetched = contacts
        .get(&id, &[ContactProperty::FirstName, ContactProperty::LastName])
        .await
        .unwrap();
    assert_eq!(fetched.get(ContactProperty::LastName), Some("Hopper"));
    assert_eq!(fetched.get(ContactProperty::Email), None);
    assert_eq!(fetched.properties().len(), 2);

    let company = adapter
        .object::<Company>()
        .unwrap()
        .create(Draft::new().set(CompanyProperty::Name, "Navy"))
        .await
        .unwrap();
    let company_id = company.id().unwrap();
    contacts
        .associate::<Company>(&id, company_id, "contact_to_company_primary")
        .await
        .unwrap();
    let page = contacts.list_associations::<Company>(&id).await.unwrap();
    assert_eq!(page.results[0].to_object_id, company_id);
    assert!(mock.calls().await.len() >= 6);
}

crm_adapter::crm_object! {
    /// Portal-defined object.
    Pet("pet") => PetProperty {
        Name = "pet_name",
    }
}

#[tokio::test]
async fn custom_objects_use_a_discovered_registry() {
    let schemas: Vec<ObjectSchema> = vec![
        serde_json::from_value(serde_json::json!({ "name": "contact", "objectTypeId": "0-1" }))
            .unwrap(),
        serde_json::from_value(serde_json::json!({ "name": "pet", "objectTypeId": "2-777" }))
            .unwrap(),
    ];
    let labels = vec![(
        "pet".to_string(),
        "contact".to_string(),
        vec![AssociationLabelType {
            category: AssociationCategory::UserDefined,
            type_id: 91,
            label: Some("Owner".to_string()),
        }],
    )];
    let registry = Registry::from_discovery("acme", &schemas, &labels);
    let mock = MockCrmBackend::new();
    let adapter = CrmAdapter::new(mock.clone(), Arc::new(registry));

    let pets = adapter.object::<Pet>().unwrap();
    assert_eq!(pets.untyped().type_id(), "2-777");
    pets.associate::<Contact>("5", "51", "pet_to_contact_owner")
        .await
        .unwrap();
    match &mock.calls().await[0] {
        MockCall::CreateAssociation { specs, .. } => {
            assert_eq!(specs[0].association_type_id, 91);
            assert_eq!(specs[0].association_category, AssociationCategory::UserDefined);
        }
        other => panic!("unexpected call {:?}", other),
    }

    assert!(matches!(
        adapter.object::<Deal>().err().unwrap(),
        AdapterError::UnknownObjectType(_)
    ));
}
