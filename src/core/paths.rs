//! core::paths
//!
//! Centralized path routing for lookup storage locations.
//!
//! # Architecture
//!
//! All lookup storage locations are routed through a single helper so
//! the on-disk layout is computed in exactly one place:
//!
//! - App-scoped lookups: `<root>/etc/apps/<namespace>/lookups/<file>`
//! - User-scoped lookups: `<root>/etc/users/<owner>/<namespace>/lookups/<file>`
//! - Default templates: the same locations with a `.default` suffix
//! - Backup snapshots: `<root>/var/backups/lookups/<identity-keyed dir>`
//!
//! **Hard rule:** no code outside this module may join storage-layout
//! segments onto the root. Callers pass sanitized [`core::types`] values;
//! this module only ever joins base-name components.
//!
//! [`core::types`]: crate::core::types
//!
//! # Example
//!
//! ```
//! use tabularium::core::paths::StoragePaths;
//! use tabularium::core::types::{LookupName, Namespace};
//! use std::path::PathBuf;
//!
//! let paths = StoragePaths::new(PathBuf::from("/opt/tabularium"));
//! let ns = Namespace::new("search").unwrap();
//! let name = LookupName::new("hosts.csv").unwrap();
//!
//! assert_eq!(
//!     paths.app_lookup(&ns, &name),
//!     PathBuf::from("/opt/tabularium/etc/apps/search/lookups/hosts.csv")
//! );
//! ```

use std::path::{Path, PathBuf};

use crate::core::types::{LookupName, Namespace, Owner};

/// Centralized path routing for lookup storage.
///
/// # Invariants
///
/// - Every join appends sanitized base-name components only
/// - No code outside this module computes storage-layout paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    /// Installation root all storage locations hang off.
    root: PathBuf,
}

impl StoragePaths {
    /// Create path routing rooted at the given installation directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The installation root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding an app-scoped namespace's lookups.
    ///
    /// This is `<root>/etc/apps/<namespace>/lookups`.
    pub fn app_lookup_dir(&self, namespace: &Namespace) -> PathBuf {
        self.root
            .join("etc")
            .join("apps")
            .join(namespace.as_str())
            .join("lookups")
    }

    /// An app-scoped lookup file.
    pub fn app_lookup(&self, namespace: &Namespace, name: &LookupName) -> PathBuf {
        self.app_lookup_dir(namespace).join(name.as_str())
    }

    /// The default-template sibling of an app-scoped lookup.
    pub fn app_lookup_default(&self, namespace: &Namespace, name: &LookupName) -> PathBuf {
        self.app_lookup_dir(namespace).join(name.default_sibling())
    }

    /// Directory holding a user's lookups for a namespace.
    ///
    /// This is `<root>/etc/users/<owner>/<namespace>/lookups`.
    pub fn user_lookup_dir(&self, owner: &Owner, namespace: &Namespace) -> PathBuf {
        self.root
            .join("etc")
            .join("users")
            .join(owner.as_str())
            .join(namespace.as_str())
            .join("lookups")
    }

    /// A user-scoped lookup file.
    pub fn user_lookup(&self, owner: &Owner, namespace: &Namespace, name: &LookupName) -> PathBuf {
        self.user_lookup_dir(owner, namespace).join(name.as_str())
    }

    /// The default-template sibling of a user-scoped lookup.
    pub fn user_lookup_default(
        &self,
        owner: &Owner,
        namespace: &Namespace,
        name: &LookupName,
    ) -> PathBuf {
        self.user_lookup_dir(owner, namespace)
            .join(name.default_sibling())
    }

    /// Root directory for backup snapshots.
    ///
    /// This is `<root>/var/backups/lookups`. Identity-keyed directories
    /// underneath it are derived by [`BackupLocator`].
    ///
    /// [`BackupLocator`]: crate::resolve::BackupLocator
    pub fn backup_root(&self) -> PathBuf {
        self.root.join("var").join("backups").join("lookups")
    }
}
