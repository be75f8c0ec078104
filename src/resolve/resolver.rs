//! resolve::resolver
//!
//! Path resolution for file-backed lookups.
//!
//! # Design
//!
//! Resolution maps a logical (name, namespace, owner, version) tuple to
//! a concrete file location:
//!
//! 1. Names are sanitized at the type level; nothing with a parent
//!    directory segment reaches a path join
//! 2. The catalog collaborator supplies the live path for the identity
//!    (and enforces authorization)
//! 3. A four-way decision table keyed by (version present, user owner
//!    present) picks the target path and the default-template sibling:
//!    versioned requests redirect entirely into the backup directory,
//!    unversioned requests use the catalog's live path
//! 4. When requested, a missing target falls back to an existing
//!    `.default` sibling, so an app can ship a template lookup that is
//!    used until real content exists
//!
//! Resolution order: exact requested version > live edited file >
//! shipped default template.
//!
//! Resolution is stateless; every call re-probes the catalog and the
//! file system, so edits and new backups are visible immediately.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::backups::BackupLocator;
use crate::catalog::{CatalogError, TableCatalog};
use crate::core::config::Settings;
use crate::core::paths::StoragePaths;
use crate::core::types::{
    LookupId, LookupVersion, Owner, ResolvedPath, SessionCredential,
};

/// Errors from lookup resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The logical identity has no resolvable backing entity.
    #[error("lookup not found: {0}")]
    NotFound(String),

    /// The catalog rejected the read for lack of authorization.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// File size exceeds the configured editable maximum.
    #[error("lookup file too large: {size} bytes exceeds limit of {limit}")]
    TooLarge {
        /// Measured file size in bytes.
        size: u64,
        /// Configured maximum in bytes.
        limit: u64,
    },

    /// The catalog backend failed.
    #[error("catalog backend error: {0}")]
    Backend(String),

    /// Filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CatalogError> for ResolveError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(key) => ResolveError::NotFound(key),
            CatalogError::PermissionDenied(msg) => ResolveError::PermissionDenied(msg),
            CatalogError::Backend(msg) => ResolveError::Backend(msg),
        }
    }
}

/// The four-way fallback decision table.
///
/// Keyed by (version present, user owner present); the shared sentinel
/// owner routes to app scope exactly like an absent owner, in both the
/// versioned and unversioned cases.
#[derive(Debug, PartialEq, Eq)]
enum Route<'a> {
    /// Versioned request for a user-scoped lookup.
    VersionedUser {
        version: &'a LookupVersion,
        owner: &'a Owner,
    },
    /// Versioned request for a shared lookup.
    VersionedShared { version: &'a LookupVersion },
    /// Unversioned request for a user-scoped lookup.
    LiveUser { owner: &'a Owner },
    /// Unversioned request for a shared lookup.
    LiveShared,
}

impl<'a> Route<'a> {
    fn select(version: Option<&'a LookupVersion>, owner: Option<&'a Owner>) -> Self {
        let user = owner.filter(|o| !o.is_shared());
        match (version, user) {
            (Some(version), Some(owner)) => Route::VersionedUser { version, owner },
            (Some(version), None) => Route::VersionedShared { version },
            (None, Some(owner)) => Route::LiveUser { owner },
            (None, None) => Route::LiveShared,
        }
    }

    fn is_versioned(&self) -> bool {
        matches!(
            self,
            Route::VersionedUser { .. } | Route::VersionedShared { .. }
        )
    }
}

/// Resolver for file-backed lookups.
///
/// Stateless per call: holds only configuration and collaborators, no
/// cached resolution state.
#[derive(Clone)]
pub struct LookupResolver {
    paths: StoragePaths,
    backups: BackupLocator,
    catalog: Arc<dyn TableCatalog>,
    settings: Settings,
}

impl std::fmt::Debug for LookupResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupResolver")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl LookupResolver {
    /// Create a resolver from settings and a catalog collaborator.
    pub fn new(settings: Settings, catalog: Arc<dyn TableCatalog>) -> Self {
        let paths = StoragePaths::new(settings.root());
        let backups = BackupLocator::new(&paths);
        Self {
            paths,
            backups,
            catalog,
            settings,
        }
    }

    /// The path routing this resolver operates over.
    pub fn storage_paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// The backup locator this resolver routes versioned requests through.
    pub fn backups(&self) -> &BackupLocator {
        &self.backups
    }

    /// Resolve a lookup identity to a concrete file location.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the catalog has no entity for the identity
    /// - `PermissionDenied` when the catalog rejects the read
    /// - `Backend` when the catalog itself fails
    pub fn resolve(
        &self,
        id: &LookupId,
        version: Option<&LookupVersion>,
        want_default_fallback: bool,
        credential: &SessionCredential,
    ) -> Result<ResolvedPath, ResolveError> {
        self.resolve_opt(id, version, want_default_fallback, credential)?
            .ok_or_else(|| ResolveError::NotFound(id.catalog_key()))
    }

    /// Tolerant resolution: a missing catalog entity yields `Ok(None)`
    /// instead of an error, so callers can distinguish "no such lookup"
    /// from "lookup exists but is an empty file".
    ///
    /// # Errors
    ///
    /// Permission and backend failures still propagate.
    pub fn resolve_opt(
        &self,
        id: &LookupId,
        version: Option<&LookupVersion>,
        want_default_fallback: bool,
        credential: &SessionCredential,
    ) -> Result<Option<ResolvedPath>, ResolveError> {
        let live = match self.catalog.resolve(&id.catalog_key(), credential) {
            Ok(entry) => entry.path,
            Err(CatalogError::NotFound(key)) => {
                debug!(key = %key, "catalog has no entity for lookup");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let route = Route::select(version, id.owner.as_ref());
        let versioned = route.is_versioned();
        let (target, default_path) = self.routed_paths(id, route, live);

        // A versioned resolution falls back to the (unversioned) default
        // template only when configured to.
        let allow_default =
            want_default_fallback && (!versioned || self.settings.backup_default_fallback());

        let resolved = if allow_default && !target.exists() && default_path.exists() {
            info!(path = %default_path.display(), "resolved lookup to default template");
            ResolvedPath::default_template(default_path)
        } else {
            info!(path = %target.display(), "resolved lookup file");
            ResolvedPath::authored(target)
        };

        Ok(Some(resolved))
    }

    /// Apply the decision table: pick the target path and the
    /// default-template sibling for a route.
    fn routed_paths(&self, id: &LookupId, route: Route<'_>, live: PathBuf) -> (PathBuf, PathBuf) {
        match route {
            Route::VersionedUser { version, owner } => {
                let dir =
                    self.backups
                        .backup_directory(&id.name, &id.namespace, Some(owner), &live);
                (
                    self.backups.snapshot_path(&dir, version),
                    self.paths
                        .user_lookup_default(owner, &id.namespace, &id.name),
                )
            }
            Route::VersionedShared { version } => {
                let dir = self
                    .backups
                    .backup_directory(&id.name, &id.namespace, None, &live);
                (
                    self.backups.snapshot_path(&dir, version),
                    self.paths.app_lookup_default(&id.namespace, &id.name),
                )
            }
            Route::LiveUser { owner } => (
                live,
                self.paths
                    .user_lookup_default(owner, &id.namespace, &id.name),
            ),
            Route::LiveShared => (live, self.paths.app_lookup_default(&id.namespace, &id.name)),
        }
    }

    /// Resolve and open a lookup file for reading.
    ///
    /// With `enforce_size_guard` set, the file's byte size is checked
    /// against the configured editable maximum before a handle is
    /// returned; oversized files fail fast instead of streaming into
    /// memory. A failed size probe is logged and treated as unknown
    /// size, not fatal.
    ///
    /// # Errors
    ///
    /// Resolution errors propagate; `TooLarge` carries the measured
    /// size; `Io` if the file cannot be opened.
    pub fn open(
        &self,
        id: &LookupId,
        version: Option<&LookupVersion>,
        want_default_fallback: bool,
        credential: &SessionCredential,
        enforce_size_guard: bool,
    ) -> Result<File, ResolveError> {
        let resolved = self.resolve(id, version, want_default_fallback, credential)?;

        if enforce_size_guard {
            let limit = self.settings.max_editable_bytes();
            match std::fs::metadata(&resolved.path) {
                Ok(meta) => {
                    let size = meta.len();
                    info!(size, path = %resolved.path.display(), "size of lookup file determined");
                    if size > limit {
                        return Err(ResolveError::TooLarge { size, limit });
                    }
                }
                Err(err) => {
                    warn!(
                        path = %resolved.path.display(),
                        error = %err,
                        "could not determine size of requested lookup file"
                    );
                }
            }
        }

        info!(path = %resolved.path.display(), "loading lookup file");
        Ok(File::open(&resolved.path)?)
    }
}
