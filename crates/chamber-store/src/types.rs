//! Secret document types

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A service's secrets without any metadata
///
/// Ordered so the serialized document is canonical (sorted keys).
pub type RawSecrets = BTreeMap<String, String>;

/// Store-assigned metadata of one document version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretsMetadata {
    /// Opaque version id assigned by the object store
    pub version: String,
    /// When the object store recorded this version, if it reported it
    pub last_modified: Option<DateTime<Utc>>,
}

impl SecretsMetadata {
    pub fn new(version: impl Into<String>, last_modified: Option<DateTime<Utc>>) -> Self {
        Self {
            version: version.into(),
            last_modified,
        }
    }
}

/// A service's secrets at one specific version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secrets {
    pub secrets: RawSecrets,
    pub meta: SecretsMetadata,
}

impl Secrets {
    pub fn new(secrets: RawSecrets, meta: SecretsMetadata) -> Self {
        Self { secrets, meta }
    }

    /// Look up a single secret value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.secrets.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}
