//! Service and key name validation
//!
//! Service and key names share one character class: ASCII letters, digits,
//! dashes and underscores. Validation runs before any network call.

use crate::error::{Result, StoreError};
use crate::types::RawSecrets;
use regex::Regex;
use std::sync::LazyLock;

static VALID_SERVICE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-_]+$").expect("service regex is valid"));

static VALID_KEY_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-_]+$").expect("key regex is valid"));

/// Check that a service name is non-empty and uses only allowed characters
pub fn validate_service(service: &str) -> Result<()> {
    if VALID_SERVICE_FORMAT.is_match(service) {
        Ok(())
    } else {
        Err(StoreError::invalid_service(service))
    }
}

/// Check that a secret key is non-empty and uses only allowed characters
pub fn validate_key(key: &str) -> Result<()> {
    if VALID_KEY_FORMAT.is_match(key) {
        Ok(())
    } else {
        Err(StoreError::invalid_key(key))
    }
}

/// Validate every key of a document
///
/// Not fail-fast: the returned [`StoreError::InvalidKeys`] lists every
/// offending key (in key order) so a bulk import can be fixed in one pass.
pub fn validate_raw_secrets(secrets: &RawSecrets) -> Result<()> {
    let invalid: Vec<String> = secrets
        .keys()
        .filter(|key| validate_key(key).is_err())
        .cloned()
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(StoreError::InvalidKeys { keys: invalid })
    }
}
