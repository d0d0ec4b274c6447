use crate::client::RemoteClient;
use crate::types::{Outcome, Record};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::{Proxy, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

pub const DEFAULT_API_VERSION: &str = "59.0";

/// Connection settings for [`RestClient`].
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// e.g. `https://example.my.salesforce.com`
    pub instance_url: String,
    pub api_version: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
    pub proxy_url: Option<String>,
    /// Ask the service to roll back a whole call when any record fails.
    pub all_or_none: bool,
}

impl RestConfig {
    pub fn new(instance_url: impl Into<String>) -> Self {
        Self {
            instance_url: instance_url.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: None,
            timeout: Duration::from_secs(30),
            proxy_url: None,
            all_or_none: false,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_all_or_none(mut self, all_or_none: bool) -> Self {
        self.all_or_none = all_or_none;
        self
    }

    /// Reads `BULK_INSTANCE_URL` (required), `BULK_ACCESS_TOKEN`,
    /// `BULK_API_VERSION`, `BULK_HTTP_TIMEOUT_SECS` and `BULK_PROXY_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let instance_url = get("BULK_INSTANCE_URL").ok_or_else(|| {
            Error::configuration_with_context(
                "instance URL is not set",
                ErrorContext::new()
                    .with_field_path("BULK_INSTANCE_URL")
                    .with_source("rest_config"),
            )
        })?;
        let mut config = Self::new(instance_url);
        config.access_token = get("BULK_ACCESS_TOKEN");
        if let Some(version) = get("BULK_API_VERSION") {
            config.api_version = version;
        }
        if let Some(secs) = get("BULK_HTTP_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        config.proxy_url = get("BULK_PROXY_URL");
        Ok(config)
    }
}

/// [`RemoteClient`] over the sObject Collections REST resource.
///
/// Per-record failures come back inline as failing [`Outcome`]s; only a
/// rejected call (non-2xx) or a transport failure is an error. Wrap it in a
/// [`StrictClient`](crate::client::StrictClient) to raise on failing outcomes.
pub struct RestClient {
    client: reqwest::Client,
    collections_url: Url,
    access_token: Option<String>,
    all_or_none: bool,
}

impl RestClient {
    pub fn new(config: RestConfig) -> Result<Self> {
        let collections_url = collections_url(&config.instance_url, &config.api_version)?;

        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if let Some(proxy_url) = &config.proxy_url {
            if let Ok(proxy) = Proxy::all(proxy_url) {
                builder = builder.proxy(proxy);
            }
        }
        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            collections_url,
            access_token: config.access_token,
            all_or_none: config.all_or_none,
        })
    }

    /// `{instance}/services/data/v{version}/composite/sobjects`
    pub fn collections_url(&self) -> &str {
        self.collections_url.as_str()
    }

    fn upsert_url(&self, object_type: &str, match_field: &str) -> Result<Url> {
        let mut url = self.collections_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::runtime_with_context(
                    "collections URL cannot be extended",
                    ErrorContext::new().with_source("rest_client"),
                )
            })?
            .push(object_type)
            .push(match_field);
        Ok(url)
    }

    fn payload<R: Serialize>(&self, records: &[R], object_type: &str) -> Result<Value> {
        let records = records
            .iter()
            .map(|record| -> Result<Value> {
                let mut value = serde_json::to_value(record)?;
                let fields = value.as_object_mut().ok_or_else(|| {
                    Error::validation_with_context(
                        "record must serialize to a JSON object",
                        ErrorContext::new()
                            .with_details(object_type)
                            .with_source("rest_client"),
                    )
                })?;
                fields.insert("attributes".to_string(), json!({ "type": object_type }));
                Ok(value)
            })
            .collect::<Result<Vec<Value>>>()?;
        Ok(json!({ "allOrNone": self.all_or_none, "records": records }))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<Outcome>> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = request
            .header("accept", "application/json")
            .header("x-request-id", &request_id);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        tracing::debug!(request_id = %request_id, status = status.as_u16(), "sobject collections call");

        if !status.is_success() {
            return Err(remote_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn collections_url(instance_url: &str, api_version: &str) -> Result<Url> {
    let invalid = |details: String| {
        Error::configuration_with_context(
            "invalid instance URL",
            ErrorContext::new()
                .with_field_path("instance_url")
                .with_details(details)
                .with_source("rest_config"),
        )
    };
    let mut url = Url::parse(instance_url).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    let version = format!("v{}", api_version);
    url.path_segments_mut()
        .map_err(|_| invalid(instance_url.to_string()))?
        .pop_if_empty()
        .extend(["services", "data", version.as_str(), "composite", "sobjects"]);
    Ok(url)
}

fn remote_error(status: u16, body: &str) -> Error {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ApiError {
        error_code: String,
        message: String,
    }

    match serde_json::from_str::<Vec<ApiError>>(body) {
        Ok(errors) if !errors.is_empty() => Error::Remote {
            status,
            code: errors[0].error_code.clone(),
            message: errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        },
        _ => Error::Remote {
            status,
            code: "http_error".to_string(),
            message: body.trim().to_string(),
        },
    }
}

#[async_trait]
impl<R> RemoteClient<R> for RestClient
where
    R: Record + Serialize,
{
    async fn create(&self, records: &[R], object_type: &str) -> Result<Vec<Outcome>> {
        let body = self.payload(records, object_type)?;
        self.send(self.client.post(self.collections_url.clone()).json(&body))
            .await
    }

    async fn update(&self, records: &[R], object_type: &str) -> Result<Vec<Outcome>> {
        let body = self.payload(records, object_type)?;
        self.send(self.client.patch(self.collections_url.clone()).json(&body))
            .await
    }

    async fn upsert(
        &self,
        match_field: &str,
        records: &[R],
        object_type: &str,
    ) -> Result<Vec<Outcome>> {
        let url = self.upsert_url(object_type, match_field)?;
        let body = self.payload(records, object_type)?;
        self.send(self.client.patch(url).json(&body)).await
    }

    async fn delete(&self, ids: &[String]) -> Result<Vec<Outcome>> {
        let query = [
            ("ids", ids.join(",")),
            ("allOrNone", self.all_or_none.to_string()),
        ];
        self.send(self.client.delete(self.collections_url.clone()).query(&query))
            .await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
