//! Import command

use anyhow::{Context, Result};
use chamber_store::SecretStore;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::{normalize_service, read_secrets_json};
use crate::cli::ImportArgs;
use crate::output;

/// Import a JSON object of secrets from a file, or stdin when the file is `-`
pub async fn run(
    args: ImportArgs,
    store: &dyn SecretStore,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let service = normalize_service(&args.service)?;

    let secrets = if args.file == Path::new("-") {
        read_secrets_json(stdin)?
    } else {
        let mut file = File::open(&args.file)
            .with_context(|| format!("Failed to open file: {}", args.file.display()))?;
        read_secrets_json(&mut file)?
    };

    let version = store
        .write_all(&service, &secrets)
        .await
        .context("Failed to import secrets")?;

    tracing::debug!("Imported {} into version {}", service, version);
    output::success(
        out,
        &format!("Successfully imported {} secrets", secrets.len()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_store::MemoryStore;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_import_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        std::fs::write(&path, r#"{"DB_PASSWORD":"s3cr3t","api_key":"abc"}"#).unwrap();

        let store = MemoryStore::in_memory();
        let mut out = Vec::new();
        let args = ImportArgs {
            service: "MyApp".to_string(),
            file: path,
        };
        run(args, &store, &mut std::io::empty(), &mut out)
            .await
            .unwrap();

        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Successfully imported 2 secrets"));
        let secrets = store.read_all("myapp", None).await.unwrap();
        assert_eq!(secrets.get("db_password"), Some("s3cr3t"));
        assert_eq!(secrets.get("api_key"), Some("abc"));
    }

    #[tokio::test]
    async fn test_import_from_stdin() {
        let store = MemoryStore::in_memory();
        let mut stdin = r#"{"token":"t"}"#.as_bytes();
        let mut out = Vec::new();
        let args = ImportArgs {
            service: "myapp".to_string(),
            file: PathBuf::from("-"),
        };
        run(args, &store, &mut stdin, &mut out).await.unwrap();

        let (value, meta) = store.read("myapp", "token", None).await.unwrap();
        assert_eq!(value, "t");
        assert_eq!(meta.version, "v1");
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let store = MemoryStore::in_memory();
        let mut out = Vec::new();
        let args = ImportArgs {
            service: "myapp".to_string(),
            file: PathBuf::from("/nonexistent/secrets.json"),
        };
        let err = run(args, &store, &mut std::io::empty(), &mut out)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to open file"));
    }

    #[tokio::test]
    async fn test_import_invalid_json() {
        let store = MemoryStore::in_memory();
        let mut stdin = "not json".as_bytes();
        let mut out = Vec::new();
        let args = ImportArgs {
            service: "myapp".to_string(),
            file: PathBuf::from("-"),
        };
        let err = run(args, &store, &mut stdin, &mut out).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to decode input as json");
    }

    #[tokio::test]
    async fn test_import_rejects_keys_differing_by_case() {
        let store = MemoryStore::in_memory();
        let mut stdin = r#"{"API_KEY":"first","api_key":"second"}"#.as_bytes();
        let mut out = Vec::new();
        let args = ImportArgs {
            service: "myapp".to_string(),
            file: PathBuf::from("-"),
        };

        let err = run(args, &store, &mut stdin, &mut out).await.unwrap_err();
        assert!(err.to_string().contains("API_KEY, api_key"));
        assert!(out.is_empty());
        assert!(matches!(
            store.read_all("myapp", None).await,
            Err(chamber_store::StoreError::NotFound { .. })
        ));
    }
}
