//! In-memory CRM backend for tests: records every call, no network.

use async_trait::async_trait;
use chrono::Utc;
use crm_types::{
    AssociationLabelType, AssociationPage, AssociationSpec, CrmBackend, CrmError,
    MultiAssociatedObjectWithLabel, ObjectCreateInput, ObjectRecord, ObjectUpdateInput,
    ValueWithTimestamp, OBJECT_ID_PROPERTY,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

/// One call received by the mock, with the arguments it was given.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    GetById {
        object_type: String,
        object_id: String,
        properties: Vec<String>,
        properties_with_history: Vec<String>,
    },
    Create {
        object_type: String,
        input_properties: BTreeMap<String, String>,
        association_count: usize,
    },
    Update {
        object_type: String,
        object_id: String,
        input_properties: BTreeMap<String, String>,
    },
    GetAssociationPage {
        from_object_type: String,
        object_id: String,
        to_object_type: String,
    },
    CreateAssociation {
        from_object_type: String,
        from_object_id: String,
        to_object_type: String,
        to_object_id: String,
        specs: Vec<AssociationSpec>,
    },
}

#[derive(Debug, Clone)]
struct StoredAssociation {
    from_object_type: String,
    from_object_id: String,
    to_object_type: String,
    to_object_id: String,
    spec: AssociationSpec,
}

#[derive(Default)]
struct MockState {
    /// (object type id, record id) -> properties.
    records: HashMap<(String, String), BTreeMap<String, String>>,
    associations: Vec<StoredAssociation>,
    calls: Vec<MockCall>,
    next_id: u64,
    fail_next: Option<CrmError>,
    /// Properties whose writes are ignored and which never appear in responses.
    read_only: BTreeSet<String>,
}

/// Mock backend behaving like a tiny HubSpot portal. Clones share state, so a test can keep
/// one handle for assertions while the adapter owns another.
#[derive(Clone)]
pub struct MockCrmBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockCrmBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                next_id: 1001,
                ..MockState::default()
            })),
        }
    }

    /// Seed a record.
    pub async fn insert<'p, I>(&self, object_type: &str, object_id: &str, properties: I)
    where
        I: IntoIterator<Item = (&'p str, &'p str)>,
    {
        let mut props: BTreeMap<String, String> = properties
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        props.insert(OBJECT_ID_PROPERTY.to_string(), object_id.to_string());
        self.state
            .lock()
            .await
            .records
            .insert((object_type.to_string(), object_id.to_string()), props);
    }

    /// Ignore writes to `property` and leave it out of every response, like a calculated
    /// HubSpot property.
    pub async fn read_only(&self, property: &str) {
        self.state.lock().await.read_only.insert(property.to_string());
    }

    /// Make the next call fail with `err` (the call is still recorded).
    pub async fn fail_next(&self, err: CrmError) {
        self.state.lock().await.fail_next = Some(err);
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.state.lock().await.calls.clone()
    }

    /// Stored properties of a record, if present.
    pub async fn record(&self, object_type: &str, object_id: &str) -> Option<BTreeMap<String, String>> {
        self.state
            .lock()
            .await
            .records
            .get(&(object_type.to_string(), object_id.to_string()))
            .cloned()
    }

    fn not_found(object_id: &str) -> CrmError {
        CrmError::Api {
            status: 404,
            message: format!("Object not found. objectId={}", object_id),
            category: Some("OBJECT_NOT_FOUND".to_string()),
            correlation_id: None,
        }
    }

    fn to_record(object_id: &str, props: &BTreeMap<String, String>) -> ObjectRecord {
        let now = Utc::now();
        ObjectRecord {
            id: object_id.to_string(),
            properties: props
                .iter()
                .map(|(k, v)| (k.clone(), Some(v.clone())))
                .collect(),
            properties_with_history: None,
            created_at: Some(now),
            updated_at: Some(now),
            archived: false,
        }
    }
}

impl Default for MockCrmBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    /// Apply written properties the way HubSpot does: an empty string clears the property and
    /// comes back as null; read-only properties are dropped. Returns the response properties.
    fn write(
        &self,
        stored: &mut BTreeMap<String, String>,
        input: &BTreeMap<String, String>,
    ) -> BTreeMap<String, Option<String>> {
        for (k, v) in input.iter().filter(|(k, _)| !self.read_only.contains(*k)) {
            if v.is_empty() {
                stored.remove(k);
            } else {
                stored.insert(k.clone(), v.clone());
            }
        }
        let mut response: BTreeMap<String, Option<String>> = stored
            .iter()
            .filter(|(k, _)| !self.read_only.contains(*k))
            .map(|(k, v)| (k.clone(), Some(v.clone())))
            .collect();
        for k in input.keys().filter(|k| !self.read_only.contains(*k)) {
            response.entry(k.clone()).or_insert(None);
        }
        response
    }

    fn record_call(&mut self, call: MockCall) -> Result<(), CrmError> {
        self.calls.push(call);
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CrmBackend for MockCrmBackend {
    async fn get_by_id(
        &self,
        object_type: &str,
        object_id: &str,
        properties: &[String],
        properties_with_history: &[String],
    ) -> Result<ObjectRecord, CrmError> {
        let mut state = self.state.lock().await;
        state.record_call(MockCall::GetById {
            object_type: object_type.to_string(),
            object_id: object_id.to_string(),
            properties: properties.to_vec(),
            properties_with_history: properties_with_history.to_vec(),
        })?;
        let props = state
            .records
            .get(&(object_type.to_string(), object_id.to_string()))
            .ok_or_else(|| Self::not_found(object_id))?;

        // Like HubSpot: every stored property plus requested-but-unset ones as null.
        let mut record = Self::to_record(object_id, props);
        record.properties.retain(|k, _| !state.read_only.contains(k));
        for p in properties.iter().filter(|p| !state.read_only.contains(*p)) {
            record.properties.entry(p.clone()).or_insert(None);
        }
        if !properties_with_history.is_empty() {
            let now = Utc::now();
            let history = properties_with_history
                .iter()
                .filter_map(|p| {
                    props.get(p).map(|v| {
                        let entry = ValueWithTimestamp {
                            value: v.clone(),
                            timestamp: now,
                            source_type: Some("API".to_string()),
                            source_id: None,
                            source_label: None,
                            updated_by_user_id: None,
                        };
                        (p.clone(), vec![entry])
                    })
                })
                .collect();
            record.properties_with_history = Some(history);
        }
        Ok(record)
    }

    async fn create(
        &self,
        object_type: &str,
        input: &ObjectCreateInput,
    ) -> Result<ObjectRecord, CrmError> {
        let mut state = self.state.lock().await;
        state.record_call(MockCall::Create {
            object_type: object_type.to_string(),
            input_properties: input.properties.clone(),
            association_count: input.associations.len(),
        })?;
        let id = state.next_id.to_string();
        state.next_id += 1;

        let mut props = BTreeMap::new();
        props.insert(OBJECT_ID_PROPERTY.to_string(), id.clone());
        props.insert("createdate".to_string(), Utc::now().to_rfc3339());
        let mut record = Self::to_record(&id, &props);
        record.properties = state.write(&mut props, &input.properties);
        state.records.insert((object_type.to_string(), id), props);
        Ok(record)
    }

    async fn update(
        &self,
        object_type: &str,
        object_id: &str,
        input: &ObjectUpdateInput,
    ) -> Result<ObjectRecord, CrmError> {
        let mut state = self.state.lock().await;
        state.record_call(MockCall::Update {
            object_type: object_type.to_string(),
            object_id: object_id.to_string(),
            input_properties: input.properties.clone(),
        })?;
        let key = (object_type.to_string(), object_id.to_string());
        let mut props = state
            .records
            .remove(&key)
            .ok_or_else(|| Self::not_found(object_id))?;
        let mut record = Self::to_record(object_id, &props);
        record.properties = state.write(&mut props, &input.properties);
        state.records.insert(key, props);
        Ok(record)
    }

    async fn get_association_page(
        &self,
        from_object_type: &str,
        object_id: &str,
        to_object_type: &str,
    ) -> Result<AssociationPage, CrmError> {
        let mut state = self.state.lock().await;
        state.record_call(MockCall::GetAssociationPage {
            from_object_type: from_object_type.to_string(),
            object_id: object_id.to_string(),
            to_object_type: to_object_type.to_string(),
        })?;

        let mut by_target: BTreeMap<String, Vec<AssociationLabelType>> = BTreeMap::new();
        for a in state.associations.iter().filter(|a| {
            a.from_object_type == from_object_type
                && a.from_object_id == object_id
                && a.to_object_type == to_object_type
        }) {
            by_target
                .entry(a.to_object_id.clone())
                .or_default()
                .push(AssociationLabelType {
                    category: a.spec.association_category,
                    type_id: a.spec.association_type_id,
                    label: None,
                });
        }
        Ok(AssociationPage {
            results: by_target
                .into_iter()
                .map(|(to_object_id, association_types)| MultiAssociatedObjectWithLabel {
                    to_object_id,
                    association_types,
                })
                .collect(),
            paging: None,
        })
    }

    async fn create_association(
        &self,
        from_object_type: &str,
        from_object_id: &str,
        to_object_type: &str,
        to_object_id: &str,
        specs: &[AssociationSpec],
    ) -> Result<(), CrmError> {
        let mut state = self.state.lock().await;
        state.record_call(MockCall::CreateAssociation {
            from_object_type: from_object_type.to_string(),
            from_object_id: from_object_id.to_string(),
            to_object_type: to_object_type.to_string(),
            to_object_id: to_object_id.to_string(),
            specs: specs.to_vec(),
        })?;
        for spec in specs {
            state.associations.push(StoredAssociation {
                from_object_type: from_object_type.to_string(),
                from_object_id: from_object_id.to_string(),
                to_object_type: to_object_type.to_string(),
                to_object_id: to_object_id.to_string(),
                spec: *spec,
            });
        }
        Ok(())
    }
}
