//! S3 backend
//!
//! Stores each service document as one object in a versioned bucket.
//! Supports AWS S3 and S3-compatible storage (MinIO, etc.) via a custom
//! endpoint.

use super::{ObjectBackend, StoredObject};
use crate::config::StoreConfig;
use crate::error::{BackendError, Result};
use async_trait::async_trait;
use aws_config::imds::region::ImdsRegionProvider;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::{ByteStream, DateTime as S3DateTime};
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// S3 backend for versioned secret documents
pub struct S3Backend {
    client: Client,
    bucket: String,
}

impl S3Backend {
    /// Create a backend from configuration
    ///
    /// The region is resolved once here, in order: the explicit override,
    /// the EC2 instance metadata service, then the SDK's default chain
    /// (`AWS_REGION`, shared config profile, ...).
    pub async fn new(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        let region_override = config.region_override.clone().map(Region::new);
        let region = RegionProviderChain::first_try(region_override)
            .or_else(ImdsRegionProvider::builder().build())
            .or_default_provider();

        let retry_config =
            RetryConfig::standard().with_max_attempts(max_attempts(config.num_retries));

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .retry_config(retry_config)
            .load()
            .await;

        debug!(
            "Resolved S3 region: {}",
            sdk_config
                .region()
                .map(|r| r.as_ref().to_string())
                .unwrap_or_else(|| "<none>".to_string())
        );

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        if let Some(endpoint_url) = config.endpoint.as_deref() {
            debug!("Using custom S3 endpoint: {}", endpoint_url);
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint_url)
                .force_path_style(true);
        }

        Ok(Self::from_client(
            Client::from_conf(s3_config_builder.build()),
            config.bucket.clone(),
        ))
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectBackend for S3Backend {
    async fn get_object(
        &self,
        key: &str,
        version: Option<&str>,
    ) -> std::result::Result<StoredObject, BackendError> {
        debug!(
            "Downloading s3://{}/{} (version: {})",
            self.bucket,
            key,
            version.unwrap_or("latest")
        );

        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .set_version_id(version.map(str::to_string))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_key() || is_missing_object_code(e.code()));
                if missing {
                    debug!("Object does not exist: s3://{}/{}", self.bucket, key);
                    return Err(BackendError::NotFound {
                        key: key.to_string(),
                        version: version.map(str::to_string),
                    });
                }
                return Err(BackendError::transport(err));
            }
        };

        let version_id = resp.version_id.ok_or_else(|| BackendError::Unversioned {
            key: key.to_string(),
        })?;
        let last_modified = resp.last_modified.as_ref().and_then(to_chrono);

        let body = resp
            .body
            .collect()
            .await
            .map_err(BackendError::transport)?
            .into_bytes()
            .to_vec();

        debug!(
            "Downloaded {} bytes from s3://{}/{} (version: {})",
            body.len(),
            self.bucket,
            key,
            version_id
        );

        Ok(StoredObject {
            body,
            version_id,
            last_modified,
        })
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
    ) -> std::result::Result<String, BackendError> {
        debug!(
            "Uploading {} bytes: s3://{}/{}",
            body.len(),
            self.bucket,
            key
        );

        let resp = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(BackendError::transport)?;

        let version_id = resp.version_id.ok_or_else(|| BackendError::Unversioned {
            key: key.to_string(),
        })?;

        info!(
            "Uploaded s3://{}/{} (version: {})",
            self.bucket, key, version_id
        );
        Ok(version_id)
    }
}

impl std::fmt::Debug for S3Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Backend")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

/// SDK attempts include the first request
fn max_attempts(num_retries: u32) -> u32 {
    num_retries.saturating_add(1)
}

/// Error codes S3 uses for an absent object or object version
fn is_missing_object_code(code: Option<&str>) -> bool {
    matches!(code, Some("NoSuchKey" | "NoSuchVersion"))
}

fn to_chrono(timestamp: &S3DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}
