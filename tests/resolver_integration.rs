//! Integration tests for file-backed lookup resolution.
//!
//! These tests exercise the resolver end-to-end against a real temporary
//! directory layout and a mock catalog, covering the fallback ordering,
//! versioned backup routing, traversal defense, and the size guard.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use tabularium::catalog::mock::MockCatalog;
use tabularium::core::config::{Settings, SettingsFile};
use tabularium::core::types::{
    LookupId, LookupName, LookupVersion, Namespace, Owner, SessionCredential,
};
use tabularium::resolve::{LookupResolver, ResolveError};

struct Fixture {
    _root: TempDir,
    resolver: LookupResolver,
    catalog: MockCatalog,
}

impl Fixture {
    fn new() -> Self {
        Self::with_settings(|_| {})
    }

    fn with_settings(adjust: impl FnOnce(&mut SettingsFile)) -> Self {
        let root = TempDir::new().unwrap();
        let mut file = SettingsFile {
            root: Some(root.path().to_path_buf()),
            ..Default::default()
        };
        adjust(&mut file);
        let settings = Settings::from_file(file).unwrap();
        let catalog = MockCatalog::new();
        let resolver = LookupResolver::new(settings, Arc::new(catalog.clone()));
        Self {
            _root: root,
            resolver,
            catalog,
        }
    }

    fn shared_id(&self, name: &str) -> LookupId {
        LookupId::new(
            LookupName::new(name).unwrap(),
            Namespace::new("search").unwrap(),
            None,
        )
    }

    fn user_id(&self, name: &str, owner: &str) -> LookupId {
        LookupId::new(
            LookupName::new(name).unwrap(),
            Namespace::new("search").unwrap(),
            Some(Owner::new(owner).unwrap()),
        )
    }

    /// Register a live app-scoped lookup in the catalog and write it.
    fn provision_live(&self, id: &LookupId, content: &str) -> PathBuf {
        let path = self
            .resolver
            .storage_paths()
            .app_lookup(&id.namespace, &id.name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        self.catalog.register(id.catalog_key(), &path);
        path
    }

    /// Register a live path in the catalog without writing the file.
    fn provision_phantom(&self, id: &LookupId) -> PathBuf {
        let path = self
            .resolver
            .storage_paths()
            .app_lookup(&id.namespace, &id.name);
        self.catalog.register(id.catalog_key(), &path);
        path
    }

    /// Write the shipped default template for an app-scoped lookup.
    fn provision_default(&self, id: &LookupId, content: &str) -> PathBuf {
        let path = self
            .resolver
            .storage_paths()
            .app_lookup_default(&id.namespace, &id.name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write a backup snapshot for an identity whose live path is known.
    fn provision_snapshot(
        &self,
        id: &LookupId,
        live: &std::path::Path,
        version: &str,
        content: &str,
    ) -> PathBuf {
        let dir = self.resolver.backups().backup_directory(
            &id.name,
            &id.namespace,
            id.owner.as_ref(),
            live,
        );
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(version);
        std::fs::write(&path, content).unwrap();
        path
    }
}

fn credential() -> SessionCredential {
    SessionCredential::new("integration-test")
}

// =============================================================================
// Live resolution
// =============================================================================

#[test]
fn resolves_live_file_when_present() {
    let fx = Fixture::new();
    let id = fx.shared_id("hosts.csv");
    let live = fx.provision_live(&id, "host,ip\nweb-1,10.0.0.1\n");

    let resolved = fx.resolver.resolve(&id, None, true, &credential()).unwrap();
    assert_eq!(resolved.path, live);
    assert!(!resolved.is_default);
}

#[test]
fn unknown_lookup_is_not_found_or_none() {
    let fx = Fixture::new();
    let id = fx.shared_id("missing.csv");

    let err = fx
        .resolver
        .resolve(&id, None, true, &credential())
        .unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(_)));

    let tolerant = fx
        .resolver
        .resolve_opt(&id, None, true, &credential())
        .unwrap();
    assert!(tolerant.is_none());
}

#[test]
fn resolution_is_idempotent_across_calls() {
    let fx = Fixture::new();
    let id = fx.shared_id("hosts.csv");
    fx.provision_live(&id, "host\n");

    let first = fx.resolver.resolve(&id, None, true, &credential()).unwrap();
    let second = fx.resolver.resolve(&id, None, true, &credential()).unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Default-template fallback ordering
// =============================================================================

#[test]
fn falls_back_to_default_when_live_missing() {
    let fx = Fixture::new();
    let id = fx.shared_id("hosts.csv");
    fx.provision_phantom(&id);
    let default_path = fx.provision_default(&id, "host,ip\n");

    let resolved = fx.resolver.resolve(&id, None, true, &credential()).unwrap();
    assert_eq!(resolved.path, default_path);
    assert!(resolved.is_default);
}

#[test]
fn no_fallback_when_not_requested() {
    let fx = Fixture::new();
    let id = fx.shared_id("hosts.csv");
    let live = fx.provision_phantom(&id);
    fx.provision_default(&id, "host,ip\n");

    let resolved = fx
        .resolver
        .resolve(&id, None, false, &credential())
        .unwrap();
    assert_eq!(resolved.path, live);
    assert!(!resolved.is_default);
}

#[test]
fn live_file_wins_over_default_template() {
    let fx = Fixture::new();
    let id = fx.shared_id("hosts.csv");
    let live = fx.provision_live(&id, "authored\n");
    fx.provision_default(&id, "template\n");

    let resolved = fx.resolver.resolve(&id, None, true, &credential()).unwrap();
    assert_eq!(resolved.path, live);
    assert!(!resolved.is_default);
}

// =============================================================================
// Versioned backup routing
// =============================================================================

#[test]
fn versioned_request_routes_into_backup_directory() {
    let fx = Fixture::new();
    let id = fx.user_id("hosts.csv", "alice");
    let live = fx.provision_phantom(&id);
    let snapshot = fx.provision_snapshot(&id, &live, "1554828000", "old,content\n");

    let version = LookupVersion::new("1554828000").unwrap();
    let resolved = fx
        .resolver
        .resolve(&id, Some(&version), false, &credential())
        .unwrap();

    assert_eq!(resolved.path, snapshot);
    assert_ne!(resolved.path, live);
    assert!(resolved
        .path
        .starts_with(fx.resolver.storage_paths().backup_root()));
}

#[test]
fn exact_version_wins_over_default_template() {
    let fx = Fixture::new();
    let id = fx.shared_id("hosts.csv");
    let live = fx.provision_phantom(&id);
    fx.provision_default(&id, "template\n");
    let snapshot = fx.provision_snapshot(&id, &live, "v2", "snapshot\n");

    let version = LookupVersion::new("v2").unwrap();
    let resolved = fx
        .resolver
        .resolve(&id, Some(&version), true, &credential())
        .unwrap();
    assert_eq!(resolved.path, snapshot);
    assert!(!resolved.is_default);
}

#[test]
fn missing_snapshot_falls_back_to_default_by_default() {
    let fx = Fixture::new();
    let id = fx.shared_id("hosts.csv");
    fx.provision_phantom(&id);
    let default_path = fx.provision_default(&id, "template\n");

    let version = LookupVersion::new("gone").unwrap();
    let resolved = fx
        .resolver
        .resolve(&id, Some(&version), true, &credential())
        .unwrap();
    assert_eq!(resolved.path, default_path);
    assert!(resolved.is_default);
}

#[test]
fn missing_snapshot_fallback_can_be_disabled() {
    let fx = Fixture::with_settings(|file| {
        file.backup_default_fallback = Some(false);
    });
    let id = fx.shared_id("hosts.csv");
    fx.provision_phantom(&id);
    fx.provision_default(&id, "template\n");

    let version = LookupVersion::new("gone").unwrap();
    let resolved = fx
        .resolver
        .resolve(&id, Some(&version), true, &credential())
        .unwrap();
    assert!(!resolved.is_default);
    assert!(resolved.path.ends_with("gone"));
}

#[test]
fn snapshots_for_same_name_in_different_scopes_do_not_collide() {
    let fx = Fixture::new();
    let shared = fx.shared_id("hosts.csv");
    let alice = fx.user_id("hosts.csv", "alice");
    let live = fx.provision_phantom(&shared);

    let shared_dir = fx.resolver.backups().backup_directory(
        &shared.name,
        &shared.namespace,
        shared.owner.as_ref(),
        &live,
    );
    let alice_dir = fx.resolver.backups().backup_directory(
        &alice.name,
        &alice.namespace,
        alice.owner.as_ref(),
        &live,
    );
    assert_ne!(shared_dir, alice_dir);
}

#[test]
fn snapshot_listing_reflects_directory_contents() {
    let fx = Fixture::new();
    let id = fx.shared_id("hosts.csv");
    let live = fx.provision_phantom(&id);
    fx.provision_snapshot(&id, &live, "200", "b\n");
    fx.provision_snapshot(&id, &live, "100", "a\n");

    let dir = fx
        .resolver
        .backups()
        .backup_directory(&id.name, &id.namespace, None, &live);
    let versions = fx.resolver.backups().list_snapshots(&dir).unwrap();
    assert_eq!(versions, vec!["100", "200"]);
}

// =============================================================================
// Traversal defense
// =============================================================================

#[test]
fn traversal_attempts_resolve_on_base_name_only() {
    let fx = Fixture::new();

    // The hostile name sanitizes to "passwd"; provision that lookup.
    let clean = fx.shared_id("passwd");
    let live = fx.provision_live(&clean, "safe\n");

    let hostile = LookupId::new(
        LookupName::new("../../../../etc/passwd").unwrap(),
        Namespace::new("../search").unwrap(),
        None,
    );
    let resolved = fx
        .resolver
        .resolve(&hostile, None, true, &credential())
        .unwrap();

    assert_eq!(resolved.path, live);
    assert!(resolved.path.starts_with(fx.resolver.storage_paths().root()));
}

#[test]
fn degenerate_names_cannot_be_constructed() {
    assert!(LookupName::new("..").is_err());
    assert!(LookupName::new("/").is_err());
    assert!(Namespace::new("").is_err());
    assert!(Owner::new("a/..").is_err());
}

// =============================================================================
// Size guard
// =============================================================================

#[test]
fn oversized_file_is_refused_when_guard_enabled() {
    let fx = Fixture::with_settings(|file| {
        file.max_editable_bytes = Some(8);
    });
    let id = fx.shared_id("hosts.csv");
    fx.provision_live(&id, "host,ip,mac,os\n");

    let err = fx
        .resolver
        .open(&id, None, true, &credential(), true)
        .unwrap_err();
    assert!(matches!(err, ResolveError::TooLarge { size: 15, limit: 8 }));
}

#[test]
fn open_returns_readable_handle() {
    use std::io::Read;

    let fx = Fixture::new();
    let id = fx.shared_id("hosts.csv");
    fx.provision_live(&id, "host,ip\n");

    let mut file = fx
        .resolver
        .open(&id, None, true, &credential(), true)
        .unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    assert_eq!(content, "host,ip\n");
}
