//! Secret store façade
//!
//! Maps read/write/delete of per-service secrets onto versioned object
//! GET/PUT. One service is one JSON object named `<prefix><service>.json`;
//! every write creates a new immutable object version.

use crate::backend::{MemoryBackend, ObjectBackend, S3Backend};
use crate::config::{object_key, StoreConfig, DEFAULT_PREFIX};
use crate::error::{Result, StoreError};
use crate::types::{RawSecrets, Secrets, SecretsMetadata};
use crate::validate::{validate_key, validate_raw_secrets, validate_service};
use async_trait::async_trait;
use tracing::{debug, info};

/// Operations on per-service secret documents
///
/// A `version` of `None` (or an empty string) selects the latest version.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Replace every secret of `service` with `secrets` in a single write
    async fn write_all(&self, service: &str, secrets: &RawSecrets) -> Result<String>;

    /// Set one secret, keeping every other key of the latest document
    ///
    /// This is a read-modify-write without a conditional put: two concurrent
    /// writers to the same service can lose an update. The document is never
    /// corrupted; the last writer wins.
    async fn write(&self, service: &str, key: &str, value: &str) -> Result<String>;

    /// Read every secret of `service` at `version`
    async fn read_all(&self, service: &str, version: Option<&str>) -> Result<Secrets>;

    /// Read one secret, with the metadata of the document version it came from
    async fn read(
        &self,
        service: &str,
        key: &str,
        version: Option<&str>,
    ) -> Result<(String, SecretsMetadata)>;

    /// Delete all secrets of `service`
    async fn delete_all(&self, service: &str) -> Result<()>;

    /// Delete one secret of `service`
    async fn delete(&self, service: &str, key: &str) -> Result<()>;
}

/// [`SecretStore`] on top of any versioned [`ObjectBackend`]
#[derive(Debug, Clone)]
pub struct ObjectSecretStore<B> {
    backend: B,
    prefix: String,
}

/// Production store backed by S3
pub type S3Store = ObjectSecretStore<S3Backend>;

/// In-memory store for tests and local experiments
pub type MemoryStore = ObjectSecretStore<MemoryBackend>;

impl<B: ObjectBackend> ObjectSecretStore<B> {
    pub fn new(backend: B, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Object name for a service
    pub fn object_key(&self, service: &str) -> String {
        object_key(&self.prefix, service)
    }
}

impl S3Store {
    /// Connect to S3 using the configuration's bucket, prefix, region and retries
    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        let backend = S3Backend::new(config).await?;
        Ok(Self::new(backend, config.prefix.clone()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryBackend::new(), DEFAULT_PREFIX)
    }
}

impl MemoryStore {
    pub fn in_memory() -> Self {
        Self::default()
    }
}

fn latest_if_empty(version: Option<&str>) -> Option<&str> {
    version.filter(|v| !v.is_empty())
}

#[async_trait]
impl<B: ObjectBackend> SecretStore for ObjectSecretStore<B> {
    async fn write_all(&self, service: &str, secrets: &RawSecrets) -> Result<String> {
        validate_service(service)?;
        validate_raw_secrets(secrets)?;

        let body = serde_json::to_vec(secrets).map_err(|source| StoreError::Encode {
            service: service.to_string(),
            source,
        })?;

        let key = self.object_key(service);
        let version = self
            .backend
            .put_object(&key, body)
            .await
            .map_err(|e| e.into_store_error("write", service))?;

        info!(
            "Wrote {} secrets for {} (version: {})",
            secrets.len(),
            service,
            version
        );
        Ok(version)
    }

    async fn write(&self, service: &str, key: &str, value: &str) -> Result<String> {
        validate_service(service)?;
        validate_key(key)?;

        let mut secrets = match self.read_all(service, None).await {
            Ok(current) => current.secrets,
            Err(StoreError::NotFound { .. }) => {
                debug!("No secrets stored for {} yet, starting empty", service);
                RawSecrets::new()
            }
            Err(e) => return Err(e),
        };

        secrets.insert(key.to_string(), value.to_string());
        self.write_all(service, &secrets).await
    }

    async fn read_all(&self, service: &str, version: Option<&str>) -> Result<Secrets> {
        validate_service(service)?;

        let version = latest_if_empty(version);
        let key = self.object_key(service);
        let object = self
            .backend
            .get_object(&key, version)
            .await
            .map_err(|e| e.into_store_error("read", service))?;

        let secrets: RawSecrets =
            serde_json::from_slice(&object.body).map_err(|source| StoreError::Decode {
                service: service.to_string(),
                source,
            })?;

        debug!(
            "Read {} secrets for {} (version: {})",
            secrets.len(),
            service,
            object.version_id
        );
        Ok(Secrets::new(
            secrets,
            SecretsMetadata::new(object.version_id, object.last_modified),
        ))
    }

    async fn read(
        &self,
        service: &str,
        key: &str,
        version: Option<&str>,
    ) -> Result<(String, SecretsMetadata)> {
        let Secrets { mut secrets, meta } = self.read_all(service, version).await?;
        let value = secrets
            .remove(key)
            .ok_or_else(|| StoreError::key_not_found(service, key))?;
        Ok((value, meta))
    }

    async fn delete_all(&self, _service: &str) -> Result<()> {
        Err(StoreError::NotImplemented {
            operation: "delete_all",
        })
    }

    async fn delete(&self, _service: &str, _key: &str) -> Result<()> {
        Err(StoreError::NotImplemented {
            operation: "delete",
        })
    }
}
