//! kv::mock
//!
//! Mock collection client for deterministic testing.
//!
//! # Design
//!
//! The mock client serves a schema content mapping and a row set from
//! memory and allows configuring failure scenarios per operation, so
//! permission and partial-failure paths can be exercised without a
//! network.
//!
//! # Example
//!
//! ```
//! use tabularium::kv::mock::MockCollectionClient;
//! use tabularium::kv::CollectionClient;
//! use tabularium::core::types::{LookupName, Namespace, SessionCredential};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let client = MockCollectionClient::new();
//! client.set_schema(json!({"field.host": "string"}).as_object().unwrap().clone());
//!
//! let ns = Namespace::new("search").unwrap();
//! let coll = LookupName::new("hosts").unwrap();
//! let credential = SessionCredential::new("test");
//!
//! let schema = client.fetch_schema(&ns, &coll, &credential).await.unwrap();
//! assert!(schema.contains_key("field.host"));
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{CollectionClient, KvError};
use crate::core::types::{LookupName, Namespace, Owner, SessionCredential};
use crate::table::Record;

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail fetch_schema with the given error.
    FetchSchema(KvError),
    /// Fail fetch_rows with the given error.
    FetchRows(KvError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    FetchSchema {
        namespace: String,
        collection: String,
    },
    FetchRows {
        namespace: String,
        owner: String,
        collection: String,
    },
}

/// Mock collection client for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockCollectionClient {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockCollectionInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockCollectionInner {
    /// Schema content mapping to serve.
    schema: Record,
    /// Rows to serve.
    rows: Vec<Record>,
    /// Operation to fail (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

impl MockCollectionClient {
    /// Create a mock client with an empty schema and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema content mapping to serve.
    pub fn set_schema(&self, schema: Record) {
        self.inner.lock().unwrap().schema = schema;
    }

    /// Set the rows to serve.
    pub fn set_rows(&self, rows: Vec<Record>) {
        self.inner.lock().unwrap().rows = rows;
    }

    /// Configure one operation to fail.
    pub fn fail_on(&self, fail: FailOn) {
        self.inner.lock().unwrap().fail_on = Some(fail);
    }

    /// Recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }
}

#[async_trait]
impl CollectionClient for MockCollectionClient {
    async fn fetch_schema(
        &self,
        namespace: &Namespace,
        collection: &LookupName,
        _credential: &SessionCredential,
    ) -> Result<Record, KvError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::FetchSchema {
            namespace: namespace.as_str().to_string(),
            collection: collection.as_str().to_string(),
        });

        if let Some(FailOn::FetchSchema(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(inner.schema.clone())
    }

    async fn fetch_rows(
        &self,
        namespace: &Namespace,
        owner: &Owner,
        collection: &LookupName,
        _credential: &SessionCredential,
    ) -> Result<Vec<Record>, KvError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::FetchRows {
            namespace: namespace.as_str().to_string(),
            owner: owner.as_str().to_string(),
            collection: collection.as_str().to_string(),
        });

        if let Some(FailOn::FetchRows(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(inner.rows.clone())
    }
}
