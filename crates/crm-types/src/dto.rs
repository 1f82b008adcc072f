//! Request and response DTOs compatible with the HubSpot CRM API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Ordered mapping from property name to string value for one record.
pub type PropertyBag = BTreeMap<String, String>;

/// Property HubSpot sets on every record; carries the record id.
pub const OBJECT_ID_PROPERTY: &str = "hs_object_id";

/// One CRM record (HubSpot SimplePublicObject / SimplePublicObjectWithAssociations).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub id: String,
    /// Unset properties come back as JSON null.
    #[serde(default)]
    pub properties: BTreeMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties_with_history: Option<BTreeMap<String, Vec<ValueWithTimestamp>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived: bool,
}

impl ObjectRecord {
    /// Non-null value of a single property.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(|v| v.as_deref())
    }

    /// Non-null properties restricted to `keys`; nothing outside `keys` is returned.
    pub fn pick<S: AsRef<str>>(&self, keys: &[S]) -> PropertyBag {
        let mut out = PropertyBag::new();
        for key in keys {
            let key = key.as_ref();
            if let Some(value) = self.property(key) {
                out.insert(key.to_string(), value.to_string());
            }
        }
        out
    }

    /// History entries recorded for `name`, newest first as HubSpot returns them.
    pub fn history(&self, name: &str) -> &[ValueWithTimestamp] {
        self.properties_with_history
            .as_ref()
            .and_then(|h| h.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// One historical value of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueWithTimestamp {
    #[serde(default)]
    pub value: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub source_label: Option<String>,
    #[serde(default)]
    pub updated_by_user_id: Option<i64>,
}

/// Current value of a property together with its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyWithHistory {
    pub value: Option<String>,
    #[serde(default)]
    pub history: Vec<ValueWithTimestamp>,
}

/// Body of `POST /crm/v3/objects/{objectType}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectCreateInput {
    pub properties: PropertyBag,
    #[serde(default)]
    pub associations: Vec<AssociationForObject>,
}

/// Body of `PATCH /crm/v3/objects/{objectType}/{objectId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectUpdateInput {
    pub properties: PropertyBag,
}

/// Association created inline with a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationForObject {
    pub to: ObjectRef,
    pub types: Vec<AssociationSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: String,
}

/// Who defined an association type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssociationCategory {
    HubspotDefined,
    UserDefined,
    IntegratorDefined,
}

/// Association type reference sent when creating an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationSpec {
    pub association_category: AssociationCategory,
    pub association_type_id: u32,
}

/// Association type as reported by the v4 APIs (labels endpoint and association pages).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationLabelType {
    pub category: AssociationCategory,
    pub type_id: u32,
    #[serde(default)]
    pub label: Option<String>,
}

/// One associated record and the association types linking to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiAssociatedObjectWithLabel {
    #[serde(deserialize_with = "string_or_number")]
    pub to_object_id: String,
    #[serde(default)]
    pub association_types: Vec<AssociationLabelType>,
}

/// One page of associations as returned by `GET /crm/v4/objects/{from}/{id}/associations/{to}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociationPage {
    #[serde(default)]
    pub results: Vec<MultiAssociatedObjectWithLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<NextPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextPage {
    pub after: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Generic `{ "results": [...] }` envelope used by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Object schema (crm-object-schemas v3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    #[serde(default)]
    pub id: String,
    pub object_type_id: String,
    pub name: String,
    #[serde(default)]
    pub fully_qualified_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: SchemaLabels,
    #[serde(default)]
    pub primary_display_property: Option<String>,
    #[serde(default)]
    pub properties: Vec<SchemaProperty>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaLabels {
    #[serde(default)]
    pub singular: Option<String>,
    #[serde(default)]
    pub plural: Option<String>,
}

/// Property definition inside an object schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaProperty {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub value_type: String,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<PropertyOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOption {
    pub label: String,
    pub value: String,
}

/// Error body HubSpot returns on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// v4 association pages report `toObjectId` as a number; other APIs use strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
