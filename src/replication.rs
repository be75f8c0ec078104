//! replication
//!
//! Best-effort change notification for clustered deployments.
//!
//! # Design
//!
//! After a lookup file changes, peers in a clustered deployment learn of
//! it through a notify endpoint. The call is fire-and-forget with no
//! transactional coupling to the read/edit flow, so HTTP-level failures
//! are reported as a structured [`ReplicationOutcome`] rather than an
//! error; only transport failures (connection refused, DNS) surface as
//! `Err`.
//!
//! A 400 response is ambiguous and classified by body content: the
//! backend answers 400 both when clustering is simply not enabled
//! (success for our purposes) and when it cannot find the lookup entity
//! (a real failure).

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info};

use crate::core::types::{LookupName, Namespace, SessionCredential};

/// Notify endpoint path, relative to the base URI.
const ENDPOINT: &str = "/services/replication/configuration/lookup-update-notify";

/// Body marker for a 400 that means "clustering not enabled".
const CLUSTERING_DISABLED_MARKER: &str = "No local ConfRepo registered";

/// Body marker for a 400 that means "lookup entity not found remotely".
const MISSING_LOOKUP_MARKER: &str = "Could not find lookup_table_file";

/// Errors from the replication transport.
///
/// HTTP-level failures are not errors; see [`ReplicationOutcome`].
#[derive(Debug, Error)]
pub enum ReplicationError {
    /// Network or connection error before any response arrived.
    #[error("network error: {0}")]
    Network(String),
}

/// Structured result of a replication notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationOutcome {
    /// Whether the notification counts as successful.
    pub ok: bool,
    /// HTTP status code of the response.
    pub status: u16,
    /// Raw response body, for diagnostics.
    pub body: String,
}

/// Classify a response into an outcome.
///
/// 200 is success. 400 is success only when the body says clustering is
/// not enabled; a missing lookup entity or any unforeseen 400 body is a
/// failure, as is every other non-200.
fn classify(status: u16, body: &str) -> bool {
    match status {
        200 => true,
        400 => body.contains(CLUSTERING_DISABLED_MARKER),
        _ => false,
    }
}

/// Client for the replication notify endpoint.
pub struct ReplicationNotifier {
    /// HTTP client for making requests
    client: Client,
    /// Default base URI of the local backend
    base: String,
}

impl std::fmt::Debug for ReplicationNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicationNotifier")
            .field("base", &self.base)
            .finish()
    }
}

impl ReplicationNotifier {
    /// Create a notifier against the given base URI.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base: base.into(),
        }
    }

    /// Notify peers that a lookup changed.
    ///
    /// `target_uri` overrides the base URI to address a remote peer
    /// directly. The notification always runs in the shared user
    /// context.
    ///
    /// # Errors
    ///
    /// Returns `ReplicationError::Network` only when no response was
    /// received at all; every HTTP response, success or not, becomes a
    /// [`ReplicationOutcome`].
    pub async fn notify(
        &self,
        app: &Namespace,
        filename: &LookupName,
        credential: &SessionCredential,
        target_uri: Option<&str>,
    ) -> Result<ReplicationOutcome, ReplicationError> {
        let uri = format!("{}{}", target_uri.unwrap_or(&self.base), ENDPOINT);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", credential.secret()))
                .map_err(|e| ReplicationError::Network(format!("invalid credential header: {e}")))?,
        );

        let form = [
            ("app", app.as_str()),
            ("filename", filename.as_str()),
            ("user", "nobody"),
        ];

        let response = self
            .client
            .post(&uri)
            .headers(headers)
            .form(&form)
            .send()
            .await
            .map_err(|e| ReplicationError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ReplicationError::Network(e.to_string()))?;

        let ok = classify(status, &body);
        if ok {
            if status == 400 {
                info!(filename = %filename, "lookup replication not applicable: clustering not enabled");
            } else {
                info!(filename = %filename, "lookup replication forced");
            }
        } else if status == 400 && body.contains(MISSING_LOOKUP_MARKER) {
            error!(filename = %filename, status, "lookup replication failed: entity not found remotely");
        } else {
            error!(filename = %filename, status, body = %body, "lookup replication failed");
        }

        Ok(ReplicationOutcome { ok, status, body })
    }
}
