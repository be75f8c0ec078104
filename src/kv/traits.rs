//! kv::traits
//!
//! Collection client trait definition for the remote key-value store.
//!
//! # Design
//!
//! The `CollectionClient` trait is async because collection reads are
//! network I/O. Both operations are idempotent reads; retry policy is a
//! transport concern and not defined here.
//!
//! Schema visibility must not depend on per-user permissions, so
//! `fetch_schema` always executes under the shared system identity.
//! Row reads execute under the caller's effective owner context.
//!
//! # Error Handling
//!
//! A 403-equivalent from either read maps to `KvError::PermissionDenied`
//! and is always propagated; projection never proceeds past it.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{LookupName, Namespace, Owner, SessionCredential};
use crate::table::Record;

/// Errors from collection operations.
#[derive(Debug, Clone, Error)]
pub enum KvError {
    /// The backend rejected the read for lack of authorization.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The collection was not found.
    #[error("collection not found: {0}")]
    NotFound(String),

    /// The backend returned an error.
    #[error("collection API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("failed to decode collection response: {0}")]
    Decode(String),
}

/// The boundary to the remote key-value collection store.
///
/// Implementations must be `Send + Sync` to allow use across async
/// tasks.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// Fetch the schema metadata record for a collection.
    ///
    /// Executed under the shared system identity regardless of the
    /// caller's owner context. Returns the raw content mapping of the
    /// collection's configuration entry; [`FieldList::from_schema_content`]
    /// derives the user-visible columns from it.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the backend returns a 403-equivalent
    /// - `NotFound` if the collection does not exist
    ///
    /// [`FieldList::from_schema_content`]: crate::table::FieldList::from_schema_content
    async fn fetch_schema(
        &self,
        namespace: &Namespace,
        collection: &LookupName,
        credential: &SessionCredential,
    ) -> Result<Record, KvError>;

    /// Fetch the raw record set of a collection.
    ///
    /// Executed under `owner`'s context.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the backend returns a 403-equivalent
    /// - `NotFound` if the collection does not exist
    async fn fetch_rows(
        &self,
        namespace: &Namespace,
        owner: &Owner,
        collection: &LookupName,
        credential: &SessionCredential,
    ) -> Result<Vec<Record>, KvError>;
}
