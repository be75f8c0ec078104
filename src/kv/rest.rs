//! kv::rest
//!
//! REST implementation of the collection client.
//!
//! # Design
//!
//! Consumes the collection store's REST surface:
//!
//! - GET `{base}/servicesNS/nobody/<ns>/storage/collections/config/<name>?output_mode=json`
//!   returning `{"entry": [{"content": {...}}]}`
//! - GET `{base}/servicesNS/<owner>/<ns>/storage/collections/data/<name>?output_mode=json`
//!   returning an array of JSON objects
//!
//! Schema reads are pinned to the shared `nobody` owner segment so that
//! schema visibility never depends on the caller's permissions; row
//! reads carry the caller's effective owner.
//!
//! # Example
//!
//! ```ignore
//! use tabularium::kv::rest::RestCollectionClient;
//! use tabularium::kv::CollectionClient;
//!
//! let client = RestCollectionClient::new("https://kv.example.com:8089");
//! let schema = client.fetch_schema(&ns, &collection, &credential).await?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{CollectionClient, KvError};
use crate::core::types::{LookupName, Namespace, Owner, SessionCredential, SHARED_OWNER};
use crate::table::Record;

/// REST collection client.
pub struct RestCollectionClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the collection store (scheme, host, port)
    base: String,
}

impl std::fmt::Debug for RestCollectionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCollectionClient")
            .field("base", &self.base)
            .finish()
    }
}

/// Envelope shape of the collection config endpoint.
#[derive(Debug, Deserialize)]
struct SchemaEnvelope {
    entry: Vec<SchemaEntry>,
}

#[derive(Debug, Deserialize)]
struct SchemaEntry {
    content: Record,
}

/// Error body shape returned by the collection store.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    messages: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    text: String,
}

impl RestCollectionClient {
    /// Create a client against the given base URL.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base: base.into(),
        }
    }

    /// The configured base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Build common headers for collection requests.
    fn headers(&self, credential: &SessionCredential) -> Result<HeaderMap, KvError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", credential.secret()))
                .map_err(|e| KvError::Network(format!("invalid credential header: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// URL of the collection config endpoint (shared owner context).
    fn config_url(&self, namespace: &Namespace, collection: &LookupName) -> String {
        format!(
            "{}/servicesNS/{}/{}/storage/collections/config/{}?output_mode=json",
            self.base, SHARED_OWNER, namespace, collection
        )
    }

    /// URL of the collection data endpoint (caller's owner context).
    fn data_url(&self, namespace: &Namespace, owner: &Owner, collection: &LookupName) -> String {
        format!(
            "{}/servicesNS/{}/{}/storage/collections/data/{}?output_mode=json",
            self.base, owner, namespace, collection
        )
    }

    /// Handle a collection response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
        subject: &str,
    ) -> Result<T, KvError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| KvError::Decode(e.to_string()))
        } else {
            Err(Self::error_for(status, response, subject).await)
        }
    }

    /// Map an error response to a `KvError`.
    async fn error_for(status: StatusCode, response: Response, subject: &str) -> KvError {
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope
                .messages
                .first()
                .map(|m| m.text.clone())
                .unwrap_or_else(|| "unknown error".to_string()),
            Err(_) => "unknown error".to_string(),
        };

        match status {
            StatusCode::FORBIDDEN => {
                KvError::PermissionDenied(format!("not permitted to read {subject}"))
            }
            StatusCode::NOT_FOUND => KvError::NotFound(subject.to_string()),
            _ => KvError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl CollectionClient for RestCollectionClient {
    async fn fetch_schema(
        &self,
        namespace: &Namespace,
        collection: &LookupName,
        credential: &SessionCredential,
    ) -> Result<Record, KvError> {
        let url = self.config_url(namespace, collection);
        let response = self
            .client
            .get(&url)
            .headers(self.headers(credential)?)
            .send()
            .await
            .map_err(|e| KvError::Network(e.to_string()))?;

        let envelope: SchemaEnvelope = self
            .handle_response(response, collection.as_str())
            .await?;

        envelope
            .entry
            .into_iter()
            .next()
            .map(|entry| entry.content)
            .ok_or_else(|| {
                KvError::Decode(format!(
                    "collection config for {collection} carried no entries"
                ))
            })
    }

    async fn fetch_rows(
        &self,
        namespace: &Namespace,
        owner: &Owner,
        collection: &LookupName,
        credential: &SessionCredential,
    ) -> Result<Vec<Record>, KvError> {
        let url = self.data_url(namespace, owner, collection);
        let response = self
            .client
            .get(&url)
            .headers(self.headers(credential)?)
            .send()
            .await
            .map_err(|e| KvError::Network(e.to_string()))?;

        self.handle_response(response, collection.as_str()).await
    }
}
