//! CLI command implementations
//!
//! Commands lowercase service and key names before they reach the store,
//! then validate them so bad names fail before any S3 call.

pub mod import;
pub mod list;
pub mod read;
pub mod write;
pub mod writeall;

use anyhow::{bail, Context, Result};
use chamber_store::{validate_key, validate_service, RawSecrets};
use std::collections::BTreeMap;
use std::io::Read;

/// Lowercase and validate a service name
pub(crate) fn normalize_service(service: &str) -> Result<String> {
    let service = service.to_lowercase();
    validate_service(&service).context("Failed to validate service")?;
    Ok(service)
}

/// Lowercase and validate a secret key
pub(crate) fn normalize_key(key: &str) -> Result<String> {
    let key = key.to_lowercase();
    validate_key(&key).context("Failed to validate key")?;
    Ok(key)
}

/// Decode a flat JSON object of strings, lowercasing its keys
///
/// Keys that only differ by case are rejected, since lowercasing would keep
/// just one of their values.
pub(crate) fn read_secrets_json(input: &mut dyn Read) -> Result<RawSecrets> {
    let decoded: RawSecrets =
        serde_json::from_reader(input).context("Failed to decode input as json")?;

    let collisions: Vec<String> = {
        let mut by_lowercase: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for key in decoded.keys() {
            by_lowercase
                .entry(key.to_lowercase())
                .or_default()
                .push(key);
        }
        by_lowercase
            .into_values()
            .filter(|keys| keys.len() > 1)
            .map(|keys| keys.join(", "))
            .collect()
    };
    if !collisions.is_empty() {
        bail!("Keys differ only by case: {}", collisions.join("; "));
    }

    Ok(decoded
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_service() {
        assert_eq!(normalize_service("MyApp").unwrap(), "myapp");
        let err = normalize_service("my app").unwrap_err();
        assert_eq!(err.to_string(), "Failed to validate service");
        assert!(format!("{:#}", err).contains("'my app'"));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("DB_Password").unwrap(), "db_password");
        assert!(normalize_key("db.password").is_err());
    }

    #[test]
    fn test_read_secrets_json_lowercases_keys() {
        let mut input = r#"{"API_KEY":"Abc","db":"x"}"#.as_bytes();
        let secrets = read_secrets_json(&mut input).unwrap();
        assert_eq!(secrets.get("api_key").map(String::as_str), Some("Abc"));
        assert_eq!(secrets.get("db").map(String::as_str), Some("x"));
        assert_eq!(secrets.len(), 2);
    }

    #[test]
    fn test_read_secrets_json_rejects_non_string_values() {
        let mut input = r#"{"port":5432}"#.as_bytes();
        let err = read_secrets_json(&mut input).unwrap_err();
        assert_eq!(err.to_string(), "Failed to decode input as json");
    }

    #[test]
    fn test_read_secrets_json_rejects_case_collisions() {
        let mut input = r#"{"API_KEY":"first","api_key":"second","Db":"x","DB":"y","ok":"z"}"#
            .as_bytes();
        let err = read_secrets_json(&mut input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Keys differ only by case: API_KEY, api_key; DB, Db"
        );
    }
}
