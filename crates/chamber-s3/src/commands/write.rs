//! Write command

use anyhow::{Context, Result};
use chamber_store::SecretStore;
use std::io::{Read, Write};

use super::{normalize_key, normalize_service};
use crate::cli::WriteArgs;
use crate::output;

/// Set a single secret; a value of `-` is read from stdin
pub async fn run(
    args: WriteArgs,
    store: &dyn SecretStore,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let service = normalize_service(&args.service)?;
    let key = normalize_key(&args.key)?;

    let value = if args.value == "-" {
        let mut buf = String::new();
        stdin
            .read_to_string(&mut buf)
            .context("Failed to read value from stdin")?;
        buf.trim_end_matches(['\r', '\n']).to_string()
    } else {
        args.value
    };

    let version = store
        .write(&service, &key, &value)
        .await
        .context("Failed to write secret")?;

    output::success(out, &format!("Wrote {}/{} (version: {})", service, key, version))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_store::MemoryStore;

    fn args(service: &str, key: &str, value: &str) -> WriteArgs {
        WriteArgs {
            service: service.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_creates_and_merges() {
        let store = MemoryStore::in_memory();
        let mut out = Vec::new();

        run(args("MyApp", "A", "1"), &store, &mut std::io::empty(), &mut out)
            .await
            .unwrap();
        run(args("myapp", "b", "2"), &store, &mut std::io::empty(), &mut out)
            .await
            .unwrap();

        let secrets = store.read_all("myapp", None).await.unwrap();
        assert_eq!(secrets.get("a"), Some("1"));
        assert_eq!(secrets.get("b"), Some("2"));
        assert_eq!(secrets.meta.version, "v2");
        assert!(String::from_utf8(out).unwrap().contains("Wrote myapp/b (version: v2)"));
    }

    #[tokio::test]
    async fn test_write_value_from_stdin() {
        let store = MemoryStore::in_memory();
        let mut stdin = "multi word value\n".as_bytes();
        let mut out = Vec::new();

        run(args("myapp", "token", "-"), &store, &mut stdin, &mut out)
            .await
            .unwrap();

        let (value, _) = store.read("myapp", "token", None).await.unwrap();
        assert_eq!(value, "multi word value");
    }

    #[tokio::test]
    async fn test_write_rejects_bad_key() {
        let store = MemoryStore::in_memory();
        let mut out = Vec::new();
        let err = run(args("myapp", "bad key", "v"), &store, &mut std::io::empty(), &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to validate key");
        assert!(store.read_all("myapp", None).await.is_err());
    }
}
