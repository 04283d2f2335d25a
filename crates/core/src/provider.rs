//! Cloud resource provider integration
//!
//! The bootstrap treats both resource kinds (storage locations, encryption
//! keys) as simple enumerable-or-creatable resources behind the
//! [`CloudProvider`] trait. The real implementation shells out to the `aws`
//! CLI and parses its JSON responses; tests use [`mock::MockProvider`].

use crate::errors::{ProviderError, Result};
use crate::resolver::Candidate;
use serde::Deserialize;
use std::process::Command;
use tracing::{debug, instrument};

/// Description attached to keys created for stack state encryption
const KEY_DESCRIPTION: &str = "Secret used to encrypt sensitive pulumi stack data";

/// Cloud resource provider abstraction.
///
/// `create_storage_location` returns the provider's location response
/// verbatim, which may carry a leading path separator; the locator builder
/// strips it.
#[allow(async_fn_in_trait)]
pub trait CloudProvider {
    /// List existing storage locations
    async fn list_storage_locations(&self) -> Result<Vec<Candidate>>;

    /// Create a storage location; returns its storage id
    async fn create_storage_location(&self, name: &str, location_hint: &str) -> Result<String>;

    /// List existing encryption keys
    async fn list_keys(&self) -> Result<Vec<Candidate>>;

    /// Create an encryption key; returns its key id
    async fn create_key(&self, name: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct ListBucketsResponse {
    #[serde(rename = "Buckets", default)]
    buckets: Vec<BucketEntry>,
}

#[derive(Debug, Deserialize)]
struct BucketEntry {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreateBucketResponse {
    #[serde(rename = "Location")]
    location: String,
}

#[derive(Debug, Deserialize)]
struct ListSecretsResponse {
    #[serde(rename = "SecretList", default)]
    secret_list: Vec<SecretEntry>,
}

#[derive(Debug, Deserialize)]
struct SecretEntry {
    #[serde(rename = "ARN")]
    arn: String,
}

#[derive(Debug, Deserialize)]
struct CreateSecretResponse {
    #[serde(rename = "ARN")]
    arn: String,
}

/// CLI-backed provider shelling out to the `aws` executable.
///
/// Credential resolution is entirely the CLI's business; nothing here
/// touches profiles or environment beyond spawning the process.
#[derive(Debug, Clone)]
pub struct CliProvider {
    aws_path: String,
}

impl CliProvider {
    pub fn new(aws_path: impl Into<String>) -> Self {
        Self {
            aws_path: aws_path.into(),
        }
    }

    /// Run one `aws` invocation and return its stdout on success
    fn run(&self, step: &str, args: &[&str]) -> Result<String> {
        debug!(step, ?args, "running aws CLI");
        let output = Command::new(&self.aws_path)
            .args(args)
            .arg("--output")
            .arg("json")
            .output()
            .map_err(|err| ProviderError::failure(step, err))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::failure(step, stderr.trim()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn parse<T: serde::de::DeserializeOwned>(step: &str, payload: &str) -> Result<T> {
        serde_json::from_str(payload).map_err(|err| ProviderError::failure(step, err).into())
    }
}

impl CloudProvider for CliProvider {
    #[instrument(skip(self))]
    async fn list_storage_locations(&self) -> Result<Vec<Candidate>> {
        let step = "list-buckets";
        let payload = self.run(step, &["s3api", "list-buckets"])?;
        let response: ListBucketsResponse = Self::parse(step, &payload)?;
        Ok(response
            .buckets
            .into_iter()
            .map(|bucket| Candidate::new(bucket.name))
            .collect())
    }

    #[instrument(skip(self))]
    async fn create_storage_location(&self, name: &str, location_hint: &str) -> Result<String> {
        let step = "create-bucket";
        let constraint = format!("LocationConstraint={}", location_hint);
        let payload = self.run(
            step,
            &[
                "s3api",
                "create-bucket",
                "--bucket",
                name,
                "--create-bucket-configuration",
                &constraint,
            ],
        )?;
        let response: CreateBucketResponse = Self::parse(step, &payload)?;
        Ok(response.location)
    }

    #[instrument(skip(self))]
    async fn list_keys(&self) -> Result<Vec<Candidate>> {
        let step = "list-secrets";
        let payload = self.run(step, &["secretsmanager", "list-secrets"])?;
        let response: ListSecretsResponse = Self::parse(step, &payload)?;
        Ok(response
            .secret_list
            .into_iter()
            .map(|secret| Candidate::new(secret.arn))
            .collect())
    }

    #[instrument(skip(self))]
    async fn create_key(&self, name: &str) -> Result<String> {
        let step = "create-secret";
        let payload = self.run(
            step,
            &[
                "secretsmanager",
                "create-secret",
                "--name",
                name,
                "--description",
                KEY_DESCRIPTION,
            ],
        )?;
        let response: CreateSecretResponse = Self::parse(step, &payload)?;
        Ok(response.arn)
    }
}

pub mod mock {
    //! Mock cloud provider for testing resolution and bootstrap flows

    use super::CloudProvider;
    use crate::errors::{ProviderError, Result};
    use crate::resolver::Candidate;
    use std::sync::{Arc, Mutex};

    /// Provider double with configurable candidates and per-step failures
    #[derive(Debug, Default, Clone)]
    pub struct MockProvider {
        storage_candidates: Vec<Candidate>,
        key_candidates: Vec<Candidate>,
        fail_step: Option<String>,
        created_storage: Arc<Mutex<Vec<(String, String)>>>,
        created_keys: Arc<Mutex<Vec<String>>>,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed the existing storage locations
        pub fn with_storage_candidates(mut self, identifiers: &[&str]) -> Self {
            self.storage_candidates = identifiers.iter().copied().map(Candidate::new).collect();
            self
        }

        /// Seed the existing encryption keys
        pub fn with_key_candidates(mut self, identifiers: &[&str]) -> Self {
            self.key_candidates = identifiers.iter().copied().map(Candidate::new).collect();
            self
        }

        /// Make the named step fail
        pub fn failing_on(mut self, step: &str) -> Self {
            self.fail_step = Some(step.to_string());
            self
        }

        fn check(&self, step: &str) -> Result<()> {
            if self.fail_step.as_deref() == Some(step) {
                return Err(ProviderError::failure(step, "injected failure").into());
            }
            Ok(())
        }

        /// Storage locations created through this mock, as (name, hint)
        pub fn created_storage(&self) -> Vec<(String, String)> {
            self.created_storage.lock().unwrap().clone()
        }

        /// Keys created through this mock
        pub fn created_keys(&self) -> Vec<String> {
            self.created_keys.lock().unwrap().clone()
        }
    }

    impl CloudProvider for MockProvider {
        async fn list_storage_locations(&self) -> Result<Vec<Candidate>> {
            self.check("list-buckets")?;
            Ok(self.storage_candidates.clone())
        }

        async fn create_storage_location(
            &self,
            name: &str,
            location_hint: &str,
        ) -> Result<String> {
            self.check("create-bucket")?;
            self.created_storage
                .lock()
                .unwrap()
                .push((name.to_string(), location_hint.to_string()));
            // Real provider responses carry a leading separator.
            Ok(format!("/{}", name))
        }

        async fn list_keys(&self) -> Result<Vec<Candidate>> {
            self.check("list-secrets")?;
            Ok(self.key_candidates.clone())
        }

        async fn create_key(&self, name: &str) -> Result<String> {
            self.check("create-secret")?;
            self.created_keys.lock().unwrap().push(name.to_string());
            Ok(format!("arn:aws:secretsmanager:eu-central-1:0:secret:{}", name))
        }
    }
}
