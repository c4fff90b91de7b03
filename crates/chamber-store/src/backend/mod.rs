//! Versioned object storage backends
//!
//! A backend exposes the two primitives the secret store needs: fetching an
//! object (latest or a pinned version) and writing a new immutable version.
//! Versioning is the backend's job; the store never keeps its own counter.

pub mod memory;
pub mod s3;

use crate::error::BackendError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use memory::MemoryBackend;
pub use s3::S3Backend;

/// One fetched object version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Raw object body
    pub body: Vec<u8>,
    /// Version id of the returned body
    pub version_id: String,
    /// When the store recorded this version
    pub last_modified: Option<DateTime<Utc>>,
}

/// Object store capable of keeping every version of an object
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Fetch an object, the latest version when `version` is `None`
    ///
    /// Returns [`BackendError::NotFound`] when the object, or the requested
    /// version of it, does not exist.
    async fn get_object(
        &self,
        key: &str,
        version: Option<&str>,
    ) -> Result<StoredObject, BackendError>;

    /// Write a new version of an object, returning its version id
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<String, BackendError>;
}
