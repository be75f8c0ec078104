//! kv::reader
//!
//! Read path for KV-backed lookups: schema fetch, field derivation, row
//! fetch, projection.
//!
//! # Design
//!
//! A KV lookup read is two collaborator calls plus a pure projection:
//!
//! 1. Fetch the collection schema (shared identity) and derive the
//!    field list from its `field.`-prefixed keys
//! 2. Fetch the raw rows under the caller's effective owner
//! 3. Project into a rectangular [`Table`]
//!
//! A permission failure on either fetch aborts the read; no partial
//! table is returned.
//!
//! [`Table`]: crate::table::Table

use std::sync::Arc;

use tracing::debug;

use super::traits::{CollectionClient, KvError};
use crate::core::types::{LookupName, Namespace, Owner, SessionCredential};
use crate::table::{project, FieldList, Table};

/// Reader composing the collection client with the tabular projector.
#[derive(Clone)]
pub struct KvTableReader {
    client: Arc<dyn CollectionClient>,
}

impl std::fmt::Debug for KvTableReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvTableReader").finish_non_exhaustive()
    }
}

impl KvTableReader {
    /// Create a reader over the given collection client.
    pub fn new(client: Arc<dyn CollectionClient>) -> Self {
        Self { client }
    }

    /// Read a KV-backed lookup as a rectangular table.
    ///
    /// `owner` defaults to the shared sentinel when absent, matching the
    /// owner context the row fetch executes under. The schema fetch
    /// always runs under the shared system identity.
    ///
    /// # Errors
    ///
    /// - `KvError::PermissionDenied` if either fetch is rejected; the
    ///   error propagates before any table is assembled
    /// - `KvError::NotFound` if the collection does not exist
    pub async fn read_table(
        &self,
        namespace: &Namespace,
        owner: Option<&Owner>,
        collection: &LookupName,
        credential: &SessionCredential,
    ) -> Result<Table, KvError> {
        let schema = self
            .client
            .fetch_schema(namespace, collection, credential)
            .await?;
        let fields = FieldList::from_schema_content(&schema);
        debug!(collection = %collection, columns = fields.len(), "derived field list");

        let effective = owner.cloned().unwrap_or_else(Owner::shared);
        let rows = self
            .client
            .fetch_rows(namespace, &effective, collection, credential)
            .await?;
        debug!(collection = %collection, rows = rows.len(), "fetched collection rows");

        Ok(project(&fields, &rows))
    }
}
