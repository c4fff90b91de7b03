//! In-memory versioned backend for testing and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{ObjectBackend, StoredObject};
use crate::error::BackendError;

#[derive(Debug, Clone)]
struct ObjectVersion {
    version_id: String,
    body: Vec<u8>,
    last_modified: DateTime<Utc>,
}

impl ObjectVersion {
    fn to_stored(&self) -> StoredObject {
        StoredObject {
            body: self.body.clone(),
            version_id: self.version_id.clone(),
            last_modified: Some(self.last_modified),
        }
    }
}

/// In-memory object store with per-object version history.
///
/// Version ids are `v1`, `v2`, ... per object. Clones share the same
/// storage. Nothing is persisted across restarts.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    objects: Arc<RwLock<HashMap<String, Vec<ObjectVersion>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of versions stored for an object name
    pub async fn version_count(&self, key: &str) -> usize {
        self.objects.read().await.get(key).map_or(0, Vec::len)
    }

    /// Every object name currently stored, sorted
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn get_object(
        &self,
        key: &str,
        version: Option<&str>,
    ) -> Result<StoredObject, BackendError> {
        let objects = self.objects.read().await;
        let not_found = || BackendError::NotFound {
            key: key.to_string(),
            version: version.map(str::to_string),
        };

        let versions = objects.get(key).ok_or_else(not_found)?;
        let found = match version {
            None => versions.last(),
            Some(id) => versions.iter().find(|v| v.version_id == id),
        };

        found.map(ObjectVersion::to_stored).ok_or_else(not_found)
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<String, BackendError> {
        let mut objects = self.objects.write().await;
        let versions = objects.entry(key.to_string()).or_default();

        let version_id = format!("v{}", versions.len() + 1);
        versions.push(ObjectVersion {
            version_id: version_id.clone(),
            body,
            last_modified: Utc::now(),
        });

        Ok(version_id)
    }
}
