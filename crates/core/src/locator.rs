//! Backend locator building
//!
//! The locator is the canonical description of where stack state lives:
//! a storage id, a path prefix, and an optional encryption key id. It is a
//! pure value object; building it performs no I/O and the only failure mode
//! is an empty storage id.

use crate::errors::{LocatorError, Result};

/// Canonical location of stack state.
///
/// Immutable once built. If any input resource changes the locator is
/// rebuilt wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendLocator {
    storage_id: String,
    path_prefix: String,
    key_id: Option<String>,
}

impl BackendLocator {
    /// Build a locator from a resolved storage id, a path prefix and an
    /// optional encryption key id.
    ///
    /// Provider responses may prefix the storage location with a path
    /// separator (`CreateBucket` returns `/<name>`); a leading `/` is
    /// stripped before use. An empty storage id (after stripping) is
    /// rejected.
    pub fn build(storage_id: &str, path_prefix: &str, key_id: Option<&str>) -> Result<Self> {
        let storage_id = storage_id.strip_prefix('/').unwrap_or(storage_id);
        if storage_id.is_empty() {
            return Err(LocatorError::Invalid {
                reason: "storage id is empty".to_string(),
            }
            .into());
        }
        Ok(Self {
            storage_id: storage_id.to_string(),
            path_prefix: path_prefix.to_string(),
            key_id: key_id.map(str::to_string),
        })
    }

    /// Resolved storage id, without any leading separator
    pub fn storage_id(&self) -> &str {
        &self.storage_id
    }

    /// Path prefix under the storage location; empty means root
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Encryption key id, when one was resolved
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// Backend URL consumed by the IaC engine, `s3://<storage>/<prefix>`
    pub fn backend_url(&self) -> String {
        format!("s3://{}/{}", self.storage_id, self.path_prefix)
    }

    /// Secrets-provider URI, `awskms://<keyId>`, when a key was resolved.
    ///
    /// `None` signals that the workspace needs no key-based secrets
    /// provider.
    pub fn secrets_provider(&self) -> Option<String> {
        self.key_id.as_ref().map(|key| format!("awskms://{}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{LocatorError, PocketrocketError};

    #[test]
    fn test_build_strips_leading_separator() {
        let locator = BackendLocator::build("/bucket/path", "", None).unwrap();
        assert_eq!(locator.storage_id(), "bucket/path");
    }

    #[test]
    fn test_build_without_separator_is_unchanged() {
        let locator = BackendLocator::build("bucket", "ops", None).unwrap();
        assert_eq!(locator.storage_id(), "bucket");
        assert_eq!(locator.path_prefix(), "ops");
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = BackendLocator::build("/bucket", "prefix", Some("arn:key")).unwrap();
        let second = BackendLocator::build("/bucket", "prefix", Some("arn:key")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_storage_id_is_rejected() {
        for input in ["", "/"] {
            let err = BackendLocator::build(input, "", None).unwrap_err();
            assert!(matches!(
                err,
                PocketrocketError::Locator(LocatorError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn test_backend_url_shape() {
        let locator = BackendLocator::build("bucket", "infra", None).unwrap();
        assert_eq!(locator.backend_url(), "s3://bucket/infra");

        // Empty prefix means root of the storage location.
        let locator = BackendLocator::build("bucket", "", None).unwrap();
        assert_eq!(locator.backend_url(), "s3://bucket/");
    }

    #[test]
    fn test_secrets_provider_uri() {
        let locator = BackendLocator::build("bucket", "", Some("arn:aws:kms:eu:1:key")).unwrap();
        assert_eq!(
            locator.secrets_provider().as_deref(),
            Some("awskms://arn:aws:kms:eu:1:key")
        );

        let locator = BackendLocator::build("bucket", "", None).unwrap();
        assert_eq!(locator.secrets_provider(), None);
    }
}
