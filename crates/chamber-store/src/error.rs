//! Error types for chamber-store

use thiserror::Error;

/// Result type alias using chamber-store's error type
pub type Result<T> = std::result::Result<T, StoreError>;

/// Boxed transport failure from an object store client
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the secret store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Service name outside the allowed character set
    #[error("Failed to validate service name '{name}'. Only alphanumeric, dashes, and underscores are allowed for service names")]
    InvalidService { name: String },

    /// Secret key outside the allowed character set
    #[error("Failed to validate key name '{name}'. Only alphanumeric, dashes, and underscores are allowed for key names")]
    InvalidKey { name: String },

    /// One or more keys of a bulk document failed validation
    #[error("{} key name(s) failed validation: {}. Only alphanumeric, dashes, and underscores are allowed for key names", .keys.len(), quote_all(.keys))]
    InvalidKeys { keys: Vec<String> },

    /// The service document (or the requested version of it) does not exist
    #[error("secrets not found for service '{service}'{}", version_suffix(.version.as_deref()))]
    NotFound {
        service: String,
        version: Option<String>,
    },

    /// The document exists but does not contain the key
    #[error("key '{key}' not found in service '{service}'")]
    KeyNotFound { service: String, key: String },

    /// The stored body is not a flat JSON object of strings
    #[error("Failed to decode secrets for service '{service}'")]
    Decode {
        service: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be serialized
    #[error("Failed to encode secrets for service '{service}'")]
    Encode {
        service: String,
        #[source]
        source: serde_json::Error,
    },

    /// The bucket did not report a version id, so history is not being kept
    #[error("object {object} has no version id; enable versioning on the bucket")]
    Unversioned { service: String, object: String },

    /// Operation declared by the store contract but not implemented
    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },

    /// Object store failure after the client's retry budget was exhausted
    #[error("Failed to {operation} secrets for service '{service}'")]
    Transport {
        operation: &'static str,
        service: String,
        #[source]
        source: BoxError,
    },

    /// Invalid store configuration
    #[error("Invalid store configuration: {message}")]
    Config { message: String },
}

fn quote_all(keys: &[String]) -> String {
    keys.iter()
        .map(|k| format!("'{}'", k))
        .collect::<Vec<_>>()
        .join(", ")
}

fn version_suffix(version: Option<&str>) -> String {
    version
        .map(|v| format!(" at version '{}'", v))
        .unwrap_or_default()
}

impl StoreError {
    /// Create an invalid service error
    pub fn invalid_service(name: impl Into<String>) -> Self {
        Self::InvalidService { name: name.into() }
    }

    /// Create an invalid key error
    pub fn invalid_key(name: impl Into<String>) -> Self {
        Self::InvalidKey { name: name.into() }
    }

    /// Create a not found error for a service, optionally pinned to a version
    pub fn not_found(service: impl Into<String>, version: Option<&str>) -> Self {
        Self::NotFound {
            service: service.into(),
            version: version.map(str::to_string),
        }
    }

    /// Create a key not found error
    pub fn key_not_found(service: impl Into<String>, key: impl Into<String>) -> Self {
        Self::KeyNotFound {
            service: service.into(),
            key: key.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for failures caused by a bad service or key name
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidService { .. } | Self::InvalidKey { .. } | Self::InvalidKeys { .. }
        )
    }

    /// True when the service document (or version) is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors reported by an [`ObjectBackend`](crate::backend::ObjectBackend)
#[derive(Error, Debug)]
pub enum BackendError {
    /// The store answered with its "no such key" / "no such version" code
    #[error("object not found: {key}")]
    NotFound {
        key: String,
        version: Option<String>,
    },

    /// The store did not return a version id for the object
    #[error("object {key} has no version id")]
    Unversioned { key: String },

    /// Anything else: network, credentials, throttling after retries
    #[error(transparent)]
    Transport(BoxError),
}

impl BackendError {
    /// Wrap a client error as a transport failure
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    /// Attach the operation and service the failure happened in
    pub(crate) fn into_store_error(self, operation: &'static str, service: &str) -> StoreError {
        match self {
            BackendError::NotFound { version, .. } => StoreError::NotFound {
                service: service.to_string(),
                version,
            },
            BackendError::Unversioned { key } => StoreError::Unversioned {
                service: service.to_string(),
                object: key,
            },
            BackendError::Transport(source) => StoreError::Transport {
                operation,
                service: service.to_string(),
                source,
            },
        }
    }
}
