//! HTTP client for the HubSpot CRM objects, associations and schemas APIs.

use async_trait::async_trait;
use crm_types::{
    ApiErrorBody, AssociationLabelType, AssociationPage, AssociationSpec, CrmBackend, CrmError,
    ObjectCreateInput, ObjectRecord, ObjectSchema, ObjectUpdateInput, ResultsEnvelope,
    SchemaSource,
};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.hubapi.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated HubSpot client. Every call is a single request; no retries.
pub struct HubspotClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
    timeout: Duration,
}

impl HubspotClient {
    /// Client authenticating with a private-app or OAuth access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the API base URL (no trailing slash).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create from `HUBSPOT_ACCESS_TOKEN` and optional `HUBSPOT_API_BASE`.
    /// Returns `None` when no non-empty token is set.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("HUBSPOT_ACCESS_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())?;
        let client = Self::new(token);
        Some(match std::env::var("HUBSPOT_API_BASE") {
            Ok(base) => client.with_api_base(base),
            Err(_) => client,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, CrmError> {
        let mut url = reqwest::Url::parse(&self.api_base)
            .map_err(|e| CrmError::Http(format!("invalid api base {}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| CrmError::Http(format!("api base {} cannot carry a path", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<String, CrmError> {
        let res = req
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CrmError::Http(e.to_string()))?;
        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| CrmError::Http(e.to_string()))?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "hubspot request failed");
            return Err(api_error(status, &body));
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, CrmError> {
        let body = self.execute(req).await?;
        serde_json::from_str(&body).map_err(|e| CrmError::Parse(e.to_string()))
    }
}

impl fmt::Debug for HubspotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubspotClient")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Map a non-2xx response to `CrmError::Api`, keeping HubSpot's message when the body parses.
fn api_error(status: reqwest::StatusCode, body: &str) -> CrmError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });
    CrmError::Api {
        status: status.as_u16(),
        message,
        category: parsed.category,
        correlation_id: parsed.correlation_id,
    }
}

fn repeated<'a>(key: &'a str, values: &'a [String]) -> Vec<(&'a str, &'a str)> {
    values.iter().map(|v| (key, v.as_str())).collect()
}

#[async_trait]
impl CrmBackend for HubspotClient {
    async fn get_by_id(
        &self,
        object_type: &str,
        object_id: &str,
        properties: &[String],
        properties_with_history: &[String],
    ) -> Result<ObjectRecord, CrmError> {
        tracing::debug!(object_type, object_id, "GET object");
        let req = self
            .client
            .get(self.url(&["crm", "v3", "objects", object_type, object_id])?)
            .query(&repeated("properties", properties))
            .query(&repeated("propertiesWithHistory", properties_with_history));
        self.send_json(req).await
    }

    async fn create(
        &self,
        object_type: &str,
        input: &ObjectCreateInput,
    ) -> Result<ObjectRecord, CrmError> {
        tracing::debug!(object_type, "POST object");
        let req = self
            .client
            .post(self.url(&["crm", "v3", "objects", object_type])?)
            .json(input);
        self.send_json(req).await
    }

    async fn update(
        &self,
        object_type: &str,
        object_id: &str,
        input: &ObjectUpdateInput,
    ) -> Result<ObjectRecord, CrmError> {
        tracing::debug!(object_type, object_id, "PATCH object");
        let req = self
            .client
            .patch(self.url(&["crm", "v3", "objects", object_type, object_id])?)
            .json(input);
        self.send_json(req).await
    }

    async fn get_association_page(
        &self,
        from_object_type: &str,
        object_id: &str,
        to_object_type: &str,
    ) -> Result<AssociationPage, CrmError> {
        tracing::debug!(from_object_type, object_id, to_object_type, "GET associations");
        let req = self.client.get(self.url(&[
            "crm",
            "v4",
            "objects",
            from_object_type,
            object_id,
            "associations",
            to_object_type,
        ])?);
        self.send_json(req).await
    }

    async fn create_association(
        &self,
        from_object_type: &str,
        from_object_id: &str,
        to_object_type: &str,
        to_object_id: &str,
        specs: &[AssociationSpec],
    ) -> Result<(), CrmError> {
        tracing::debug!(
            from_object_type,
            from_object_id,
            to_object_type,
            to_object_id,
            "PUT association"
        );
        let req = self
            .client
            .put(self.url(&[
                "crm",
                "v4",
                "objects",
                from_object_type,
                from_object_id,
                "associations",
                to_object_type,
                to_object_id,
            ])?)
            .json(specs);
        self.execute(req).await?;
        Ok(())
    }
}

#[async_trait]
impl SchemaSource for HubspotClient {
    async fn custom_schemas(&self) -> Result<Vec<ObjectSchema>, CrmError> {
        let req = self
            .client
            .get(self.url(&["crm-object-schemas", "v3", "schemas"])?);
        let envelope: ResultsEnvelope<ObjectSchema> = self.send_json(req).await?;
        Ok(envelope.results)
    }

    async fn schema(&self, object_type: &str) -> Result<ObjectSchema, CrmError> {
        let req = self
            .client
            .get(self.url(&["crm-object-schemas", "v3", "schemas", object_type])?);
        self.send_json(req).await
    }

    async fn association_labels(
        &self,
        from_object_type_id: &str,
        to_object_type_id: &str,
    ) -> Result<Vec<AssociationLabelType>, CrmError> {
        let req = self.client.get(self.url(&[
            "crm",
            "v4",
            "associations",
            from_object_type_id,
            to_object_type_id,
            "labels",
        ])?);
        let envelope: ResultsEnvelope<AssociationLabelType> = self.send_json(req).await?;
        Ok(envelope.results)
    }
}
