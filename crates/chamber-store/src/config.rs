//! Store configuration
//!
//! Built once by the caller (usually from CLI flags and environment) and
//! handed to the store constructor. There is no global configuration.

use crate::error::{Result, StoreError};

/// Suffix appended to every service object name
pub const OBJECT_SUFFIX: &str = ".json";

/// Default object name prefix
pub const DEFAULT_PREFIX: &str = "chamber/";

/// Default number of retries handed to the S3 client
pub const DEFAULT_NUM_RETRIES: u32 = 10;

/// Bucket name environment variable
pub const BUCKET_ENV: &str = "CHAMBER_S3_BUCKET";

/// Object name prefix environment variable
pub const PREFIX_ENV: &str = "CHAMBER_S3_PREFIX";

/// Region override environment variable
pub const REGION_ENV: &str = "CHAMBER_AWS_REGION";

/// Custom S3-compatible endpoint environment variable
pub const ENDPOINT_ENV: &str = "CHAMBER_S3_ENDPOINT";

/// Configuration for an S3-backed secret store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// S3 bucket name (required)
    pub bucket: String,
    /// Object name prefix, may be empty
    pub prefix: String,
    /// Maximum retries for a single S3 request
    pub num_retries: u32,
    /// Region that takes priority over every other source
    pub region_override: Option<String>,
    /// Custom S3-compatible endpoint (MinIO, etc.)
    pub endpoint: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            prefix: DEFAULT_PREFIX.to_string(),
            num_retries: DEFAULT_NUM_RETRIES,
            region_override: None,
            endpoint: None,
        }
    }
}

impl StoreConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_num_retries(mut self, num_retries: u32) -> Self {
        self.num_retries = num_retries;
        self
    }

    pub fn with_region_override(mut self, region: Option<String>) -> Self {
        self.region_override = region;
        self
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Reject configurations the store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(StoreError::config(format!(
                "bucket not set (use --bucket or ${})",
                BUCKET_ENV
            )));
        }
        Ok(())
    }

    /// Full object name for a service: `<prefix><service>.json`
    pub fn object_key(&self, service: &str) -> String {
        object_key(&self.prefix, service)
    }
}

/// Build the object name for a service under a prefix
pub fn object_key(prefix: &str, service: &str) -> String {
    format!("{}{}{}", prefix, service, OBJECT_SUFFIX)
}
