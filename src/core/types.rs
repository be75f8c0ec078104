//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`LookupName`] - Sanitized lookup file name
//! - [`Namespace`] - Sanitized owning application scope
//! - [`Owner`] - Sanitized user scope, with a shared sentinel
//! - [`LookupVersion`] - Opaque backup snapshot token
//! - [`LookupId`] - Composite lookup identity
//! - [`SessionCredential`] - Opaque bearer credential for collaborators
//! - [`ResolvedPath`] - Result of path resolution
//!
//! # Sanitization
//!
//! Every name that participates in path construction is reduced to its
//! base-name component at construction time. A value containing path
//! separators keeps only the trailing component; values that reduce to
//! nothing (empty, `.`, `..`) are rejected. There is no unsanitized
//! constructor, so parent-directory segments cannot reach path joins.
//!
//! # Examples
//!
//! ```
//! use tabularium::core::types::{LookupName, Namespace, Owner};
//!
//! // Traversal attempts are reduced to the base name
//! let name = LookupName::new("../../etc/passwd").unwrap();
//! assert_eq!(name.as_str(), "passwd");
//!
//! // Values with no usable base name fail at construction time
//! assert!(LookupName::new("..").is_err());
//! assert!(Namespace::new("").is_err());
//!
//! // The shared owner sentinel
//! assert!(Owner::shared().is_shared());
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Owner name meaning "shared, no specific user".
pub const SHARED_OWNER: &str = "nobody";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid lookup name: {0}")]
    InvalidLookupName(String),

    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    #[error("invalid owner: {0}")]
    InvalidOwner(String),

    #[error("invalid version token: {0}")]
    InvalidVersion(String),
}

/// Reduce a raw value to its base-name component.
///
/// Splits on both separator styles so a value smuggled in from a foreign
/// platform cannot carry a separator through. Returns `None` when nothing
/// usable remains.
fn base_component(raw: &str) -> Option<&str> {
    let tail = raw.rsplit(['/', '\\']).next().unwrap_or("");
    if tail.is_empty() || tail == "." || tail == ".." {
        None
    } else {
        Some(tail)
    }
}

/// A sanitized lookup file name.
///
/// Holds only the base-name component of whatever was supplied.
///
/// # Example
///
/// ```
/// use tabularium::core::types::LookupName;
///
/// let name = LookupName::new("test.csv").unwrap();
/// assert_eq!(name.as_str(), "test.csv");
///
/// // Path prefixes are discarded, not rejected
/// let name = LookupName::new("dir/sub/test.csv").unwrap();
/// assert_eq!(name.as_str(), "test.csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LookupName(String);

impl LookupName {
    /// Create a sanitized lookup name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidLookupName` if no base-name component
    /// remains after sanitization.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeError> {
        let raw = raw.as_ref();
        base_component(raw)
            .map(|s| Self(s.to_string()))
            .ok_or_else(|| TypeError::InvalidLookupName(raw.to_string()))
    }

    /// The sanitized name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name with the default-template suffix appended.
    pub fn default_sibling(&self) -> String {
        format!("{}.default", self.0)
    }
}

impl std::fmt::Display for LookupName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for LookupName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LookupName> for String {
    fn from(value: LookupName) -> Self {
        value.0
    }
}

/// A sanitized namespace (owning application scope).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Create a sanitized namespace.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidNamespace` if no base-name component
    /// remains after sanitization.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeError> {
        let raw = raw.as_ref();
        base_component(raw)
            .map(|s| Self(s.to_string()))
            .ok_or_else(|| TypeError::InvalidNamespace(raw.to_string()))
    }

    /// The sanitized namespace.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(value: Namespace) -> Self {
        value.0
    }
}

/// A sanitized owner (user scope).
///
/// The sentinel value `nobody` means "shared, no specific user"; path
/// resolution treats a shared owner the same as an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Owner(String);

impl Owner {
    /// Create a sanitized owner.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOwner` if no base-name component
    /// remains after sanitization.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeError> {
        let raw = raw.as_ref();
        base_component(raw)
            .map(|s| Self(s.to_string()))
            .ok_or_else(|| TypeError::InvalidOwner(raw.to_string()))
    }

    /// The shared sentinel owner.
    pub fn shared() -> Self {
        Self(SHARED_OWNER.to_string())
    }

    /// Whether this is the shared sentinel.
    pub fn is_shared(&self) -> bool {
        self.0 == SHARED_OWNER
    }

    /// The sanitized owner name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Owner {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Owner> for String {
    fn from(value: Owner) -> Self {
        value.0
    }
}

/// An opaque version token naming a backup snapshot.
///
/// Absence of a version means "current". The token names a file inside
/// the backup directory, so it is sanitized like any other name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LookupVersion(String);

impl LookupVersion {
    /// Create a sanitized version token.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidVersion` if no base-name component
    /// remains after sanitization.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeError> {
        let raw = raw.as_ref();
        base_component(raw)
            .map(|s| Self(s.to_string()))
            .ok_or_else(|| TypeError::InvalidVersion(raw.to_string()))
    }

    /// The sanitized token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LookupVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for LookupVersion {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LookupVersion> for String {
    fn from(value: LookupVersion) -> Self {
        value.0
    }
}

/// Composite lookup identity: name, namespace, and optional owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupId {
    /// The lookup file name (base name only).
    pub name: LookupName,
    /// The owning application scope.
    pub namespace: Namespace,
    /// The user scope; `None` means shared.
    pub owner: Option<Owner>,
}

impl LookupId {
    /// Create a lookup identity.
    pub fn new(name: LookupName, namespace: Namespace, owner: Option<Owner>) -> Self {
        Self {
            name,
            namespace,
            owner,
        }
    }

    /// The effective owner name, substituting the shared sentinel when
    /// no owner is set.
    pub fn effective_owner(&self) -> &str {
        self.owner.as_ref().map_or(SHARED_OWNER, |o| o.as_str())
    }

    /// Whether this identity is scoped to a specific user.
    ///
    /// The shared sentinel counts as "no specific user".
    pub fn has_user_owner(&self) -> bool {
        self.owner.as_ref().is_some_and(|o| !o.is_shared())
    }

    /// Deterministic composite key consumed by the file-metadata catalog.
    ///
    /// Two identities produce the same key iff they name the same lookup.
    pub fn catalog_key(&self) -> String {
        format!(
            "{}/{}/{}",
            self.effective_owner(),
            self.namespace,
            self.name
        )
    }
}

impl std::fmt::Display for LookupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.catalog_key())
    }
}

/// Opaque bearer credential passed through to collaborators.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

// Custom Debug to avoid exposing the credential
impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionCredential").field(&"<redacted>").finish()
    }
}

impl SessionCredential {
    /// Wrap a raw credential.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw credential, for collaborators that need to send it.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

/// The result of resolving a lookup identity to a physical location.
///
/// Computed on demand and never cached across calls; files and backups
/// change between edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Absolute path to the file to read.
    pub path: PathBuf,
    /// Whether this is the shipped default template rather than the
    /// authored file.
    pub is_default: bool,
}

impl ResolvedPath {
    /// A resolution that landed on the authored (live or backup) file.
    pub fn authored(path: PathBuf) -> Self {
        Self {
            path,
            is_default: false,
        }
    }

    /// A resolution that fell back to the shipped default template.
    pub fn default_template(path: PathBuf) -> Self {
        Self {
            path,
            is_default: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_name_accepts_plain_names() {
        let name = LookupName::new("test.csv").unwrap();
        assert_eq!(name.as_str(), "test.csv");
    }

    #[test]
    fn lookup_name_strips_path_prefix() {
        let name = LookupName::new("../../etc/passwd").unwrap();
        assert_eq!(name.as_str(), "passwd");
    }

    #[test]
    fn lookup_name_strips_backslash_prefix() {
        let name = LookupName::new("..\\..\\windows\\system32").unwrap();
        assert_eq!(name.as_str(), "system32");
    }

    #[test]
    fn lookup_name_rejects_degenerate_values() {
        assert!(LookupName::new("").is_err());
        assert!(LookupName::new(".").is_err());
        assert!(LookupName::new("..").is_err());
        assert!(LookupName::new("/").is_err());
        assert!(LookupName::new("a/..").is_err());
    }

    #[test]
    fn lookup_name_default_sibling() {
        let name = LookupName::new("test.csv").unwrap();
        assert_eq!(name.default_sibling(), "test.csv.default");
    }

    #[test]
    fn namespace_sanitizes() {
        let ns = Namespace::new("../search").unwrap();
        assert_eq!(ns.as_str(), "search");
        assert!(Namespace::new("..").is_err());
    }

    #[test]
    fn owner_shared_sentinel() {
        assert!(Owner::shared().is_shared());
        assert_eq!(Owner::shared().as_str(), SHARED_OWNER);
        assert!(!Owner::new("alice").unwrap().is_shared());
    }

    #[test]
    fn owner_named_nobody_is_shared() {
        assert!(Owner::new("nobody").unwrap().is_shared());
    }

    #[test]
    fn version_sanitizes() {
        let v = LookupVersion::new("1554828000").unwrap();
        assert_eq!(v.as_str(), "1554828000");
        let v = LookupVersion::new("../1554828000").unwrap();
        assert_eq!(v.as_str(), "1554828000");
    }

    #[test]
    fn lookup_id_effective_owner() {
        let id = LookupId::new(
            LookupName::new("test.csv").unwrap(),
            Namespace::new("search").unwrap(),
            None,
        );
        assert_eq!(id.effective_owner(), "nobody");
        assert!(!id.has_user_owner());

        let id = LookupId::new(
            LookupName::new("test.csv").unwrap(),
            Namespace::new("search").unwrap(),
            Some(Owner::new("alice").unwrap()),
        );
        assert_eq!(id.effective_owner(), "alice");
        assert!(id.has_user_owner());
    }

    #[test]
    fn shared_owner_is_not_a_user_owner() {
        let id = LookupId::new(
            LookupName::new("test.csv").unwrap(),
            Namespace::new("search").unwrap(),
            Some(Owner::shared()),
        );
        assert!(!id.has_user_owner());
    }

    #[test]
    fn catalog_key_is_deterministic() {
        let id = LookupId::new(
            LookupName::new("test.csv").unwrap(),
            Namespace::new("search").unwrap(),
            Some(Owner::new("alice").unwrap()),
        );
        assert_eq!(id.catalog_key(), "alice/search/test.csv");
        assert_eq!(id.catalog_key(), id.clone().catalog_key());
    }

    #[test]
    fn catalog_keys_differ_across_scopes() {
        let name = LookupName::new("test.csv").unwrap();
        let a = LookupId::new(name.clone(), Namespace::new("search").unwrap(), None);
        let b = LookupId::new(name.clone(), Namespace::new("other").unwrap(), None);
        let c = LookupId::new(
            name,
            Namespace::new("search").unwrap(),
            Some(Owner::new("alice").unwrap()),
        );
        assert_ne!(a.catalog_key(), b.catalog_key());
        assert_ne!(a.catalog_key(), c.catalog_key());
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = SessionCredential::new("s3cret-token");
        let repr = format!("{:?}", cred);
        assert!(!repr.contains("s3cret-token"));
        assert!(repr.contains("redacted"));
    }

    #[test]
    fn resolved_path_constructors() {
        let authored = ResolvedPath::authored(PathBuf::from("/srv/lookups/test.csv"));
        assert!(!authored.is_default);

        let fallback =
            ResolvedPath::default_template(PathBuf::from("/srv/lookups/test.csv.default"));
        assert!(fallback.is_default);
    }
}
