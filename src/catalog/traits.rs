//! catalog::traits
//!
//! Table catalog trait definition for the file-metadata collaborator.
//!
//! # Design
//!
//! The `TableCatalog` trait is the boundary to whatever service knows
//! where a lookup's live file actually sits on disk and whether the
//! caller is allowed to see it. The resolver never guesses at live
//! paths; it asks the catalog.
//!
//! Keys are the deterministic composite keys built by
//! [`LookupId::catalog_key`], so two identities collide iff they name
//! the same lookup.
//!
//! # Example
//!
//! ```ignore
//! use tabularium::catalog::{TableCatalog, CatalogError};
//! use tabularium::core::types::{LookupId, SessionCredential};
//!
//! fn live_path(
//!     catalog: &dyn TableCatalog,
//!     id: &LookupId,
//!     credential: &SessionCredential,
//! ) -> Result<std::path::PathBuf, CatalogError> {
//!     let entry = catalog.resolve(&id.catalog_key(), credential)?;
//!     Ok(entry.path)
//! }
//! ```
//!
//! [`LookupId::catalog_key`]: crate::core::types::LookupId::catalog_key

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::SessionCredential;

/// Errors from catalog operations.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// No entity is registered under the given key.
    #[error("lookup not found: {0}")]
    NotFound(String),

    /// The catalog rejected the read for lack of authorization.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The backing service failed.
    #[error("catalog backend error: {0}")]
    Backend(String),
}

/// A catalog entry for a lookup table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFileEntry {
    /// Absolute path to the live lookup file.
    pub path: PathBuf,
}

/// The boundary to the file-metadata service.
///
/// Implementations must be thread-safe (`Send + Sync`). Reads are
/// idempotent; the resolver may call `resolve` for the same key any
/// number of times and expects the same answer absent external change.
///
/// # Error Handling
///
/// - `NotFound`: the logical identity has no backing entity. The
///   resolver either propagates this or converts it to a null result,
///   depending on the caller's tolerance.
/// - `PermissionDenied`: always propagated, never downgraded.
/// - `Backend`: infrastructure failure; propagated.
pub trait TableCatalog: Send + Sync {
    /// Resolve the live file entry for a composite lookup key.
    fn resolve(
        &self,
        key: &str,
        credential: &SessionCredential,
    ) -> Result<TableFileEntry, CatalogError>;
}
