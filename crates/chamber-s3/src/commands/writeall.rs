//! Writeall command

use anyhow::{Context, Result};
use chamber_store::SecretStore;
use std::io::{Read, Write};

use super::{normalize_service, read_secrets_json};
use crate::cli::WriteAllArgs;

/// Replace every secret of a service with the JSON object read from stdin
pub async fn run(
    args: WriteAllArgs,
    store: &dyn SecretStore,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let service = normalize_service(&args.service)?;
    let secrets = read_secrets_json(stdin)?;

    let version = store
        .write_all(&service, &secrets)
        .await
        .context("Failed to write secrets")?;

    writeln!(out, "Version: {}", version)?;
    Ok(())
}
