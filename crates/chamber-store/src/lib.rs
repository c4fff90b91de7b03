//! Per-service secret storage on versioned object stores
//!
//! Each service's secrets live in one flat JSON object named
//! `<prefix><service>.json`. History comes from the object store's native
//! versioning: every write creates a new immutable version, and any past
//! version can be read back by its id.
//!
//! - **Validation**: service and key names are checked before any I/O
//! - **Backends**: AWS S3 (and S3-compatible endpoints) or in-memory
//! - **Store**: [`SecretStore`] with read-modify-write for single keys

pub mod backend;
pub mod config;
pub mod error;
pub mod store;
pub mod types;
pub mod validate;

pub use backend::{MemoryBackend, ObjectBackend, S3Backend, StoredObject};
pub use config::StoreConfig;
pub use error::{BackendError, Result, StoreError};
pub use store::{MemoryStore, ObjectSecretStore, S3Store, SecretStore};
pub use types::{RawSecrets, Secrets, SecretsMetadata};
pub use validate::{validate_key, validate_raw_secrets, validate_service};
