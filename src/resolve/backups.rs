//! resolve::backups
//!
//! Identity-keyed backup directory derivation and snapshot listing.
//!
//! # Design
//!
//! Historical snapshots of a lookup live in a per-identity directory
//! distinct from the live path. The directory name is derived
//! deterministically from the identity tuple plus the resolved live
//! path, so two lookups sharing a file name in different namespaces or
//! owner scopes never collide. Inside the directory, each snapshot file
//! is named by its opaque version token.
//!
//! # Example
//!
//! ```
//! use tabularium::core::paths::StoragePaths;
//! use tabularium::core::types::{LookupName, Namespace};
//! use tabularium::resolve::BackupLocator;
//! use std::path::{Path, PathBuf};
//!
//! let paths = StoragePaths::new(PathBuf::from("/opt/tabularium"));
//! let locator = BackupLocator::new(&paths);
//!
//! let name = LookupName::new("hosts.csv").unwrap();
//! let ns = Namespace::new("search").unwrap();
//! let live = Path::new("/opt/tabularium/etc/apps/search/lookups/hosts.csv");
//!
//! let dir = locator.backup_directory(&name, &ns, None, live);
//! assert!(dir.starts_with("/opt/tabularium/var/backups/lookups/search"));
//! ```

use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::core::paths::StoragePaths;
use crate::core::types::{LookupName, LookupVersion, Namespace, Owner, SHARED_OWNER};

/// Hex characters of the identity digest kept in the directory name.
///
/// 16 hex characters is 64 bits of digest, far past accidental-collision
/// territory for the handful of lookups an installation carries, while
/// keeping the directory name readable next to the lookup name.
const DIGEST_LEN: usize = 16;

/// Derives backup storage locations for lookup identities.
#[derive(Debug, Clone)]
pub struct BackupLocator {
    backup_root: PathBuf,
}

impl BackupLocator {
    /// Create a locator rooted at the storage layout's backup root.
    pub fn new(paths: &StoragePaths) -> Self {
        Self {
            backup_root: paths.backup_root(),
        }
    }

    /// The directory holding snapshots for the given identity.
    ///
    /// This is `<backup-root>/<namespace>/<name>-<digest>` where the
    /// digest covers the full identity tuple and the resolved live path.
    /// The mapping is deterministic: the same identity always lands in
    /// the same directory.
    pub fn backup_directory(
        &self,
        name: &LookupName,
        namespace: &Namespace,
        owner: Option<&Owner>,
        resolved_live_path: &Path,
    ) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(name.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(namespace.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(owner.map_or(SHARED_OWNER, |o| o.as_str()).as_bytes());
        hasher.update([0u8]);
        hasher.update(resolved_live_path.as_os_str().as_encoded_bytes());

        let digest = hex::encode(hasher.finalize());
        self.backup_root
            .join(namespace.as_str())
            .join(format!("{}-{}", name, &digest[..DIGEST_LEN]))
    }

    /// Path of one snapshot inside a backup directory.
    pub fn snapshot_path(&self, backup_dir: &Path, version: &LookupVersion) -> PathBuf {
        backup_dir.join(version.as_str())
    }

    /// List the version tokens currently present in a backup directory,
    /// sorted lexicographically. A missing directory lists as empty
    /// (no snapshots have been taken yet).
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory exists but cannot be read.
    pub fn list_snapshots(&self, backup_dir: &Path) -> io::Result<Vec<String>> {
        if !backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in std::fs::read_dir(backup_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Ok(name) = entry.file_name().into_string() {
                    versions.push(name);
                }
            }
        }
        versions.sort();
        Ok(versions)
    }
}
