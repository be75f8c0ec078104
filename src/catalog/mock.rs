//! catalog::mock
//!
//! Mock catalog implementation for deterministic testing.
//!
//! # Design
//!
//! The mock catalog stores key-to-path registrations in memory and
//! allows configuring failure scenarios, mirroring how the real
//! file-metadata service would answer.
//!
//! # Example
//!
//! ```
//! use tabularium::catalog::mock::MockCatalog;
//! use tabularium::catalog::TableCatalog;
//! use tabularium::core::types::SessionCredential;
//! use std::path::PathBuf;
//!
//! let catalog = MockCatalog::new();
//! catalog.register("nobody/search/hosts.csv", "/srv/lookups/hosts.csv");
//!
//! let credential = SessionCredential::new("test-credential");
//! let entry = catalog.resolve("nobody/search/hosts.csv", &credential).unwrap();
//! assert_eq!(entry.path, PathBuf::from("/srv/lookups/hosts.csv"));
//!
//! assert!(catalog.resolve("nobody/search/missing.csv", &credential).is_err());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::traits::{CatalogError, TableCatalog, TableFileEntry};
use crate::core::types::SessionCredential;

/// Mock catalog for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockCatalogInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockCatalogInner {
    /// Registered entries by composite key.
    entries: HashMap<String, PathBuf>,
    /// Error to return instead of resolving (for testing error paths).
    fail_with: Option<CatalogError>,
    /// Keys that have been resolved, in call order.
    resolved_keys: Vec<String>,
}

impl MockCatalog {
    /// Create an empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live path for a composite key.
    pub fn register(&self, key: impl Into<String>, path: impl AsRef<Path>) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .entries
            .insert(key.into(), path.as_ref().to_path_buf());
    }

    /// Make every subsequent `resolve` call fail with the given error.
    pub fn fail_with(&self, error: CatalogError) {
        self.inner.lock().unwrap().fail_with = Some(error);
    }

    /// Keys passed to `resolve`, in call order.
    pub fn resolved_keys(&self) -> Vec<String> {
        self.inner.lock().unwrap().resolved_keys.clone()
    }
}

impl TableCatalog for MockCatalog {
    fn resolve(
        &self,
        key: &str,
        _credential: &SessionCredential,
    ) -> Result<TableFileEntry, CatalogError> {
        let mut inner = self.inner.lock().unwrap();
        inner.resolved_keys.push(key.to_string());

        if let Some(err) = &inner.fail_with {
            return Err(err.clone());
        }

        inner
            .entries
            .get(key)
            .map(|path| TableFileEntry { path: path.clone() })
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> SessionCredential {
        SessionCredential::new("test-credential")
    }

    #[test]
    fn resolve_returns_registered_entry() {
        let catalog = MockCatalog::new();
        catalog.register("nobody/search/a.csv", "/data/a.csv");

        let entry = catalog.resolve("nobody/search/a.csv", &credential()).unwrap();
        assert_eq!(entry.path, PathBuf::from("/data/a.csv"));
    }

    #[test]
    fn resolve_unknown_key_is_not_found() {
        let catalog = MockCatalog::new();
        let err = catalog
            .resolve("nobody/search/missing.csv", &credential())
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn fail_with_overrides_entries() {
        let catalog = MockCatalog::new();
        catalog.register("nobody/search/a.csv", "/data/a.csv");
        catalog.fail_with(CatalogError::PermissionDenied("denied".into()));

        let err = catalog.resolve("nobody/search/a.csv", &credential()).unwrap_err();
        assert!(matches!(err, CatalogError::PermissionDenied(_)));
    }

    #[test]
    fn resolved_keys_are_recorded_in_order() {
        let catalog = MockCatalog::new();
        catalog.register("k1", "/p1");
        let _ = catalog.resolve("k1", &credential());
        let _ = catalog.resolve("k2", &credential());

        assert_eq!(catalog.resolved_keys(), vec!["k1", "k2"]);
    }

    #[test]
    fn clones_share_state() {
        let catalog = MockCatalog::new();
        let clone = catalog.clone();
        clone.register("k", "/p");

        assert!(catalog.resolve("k", &credential()).is_ok());
    }
}
