//! List command

use anyhow::{Context, Result};
use chamber_store::SecretStore;
use std::io::Write;

use super::normalize_service;
use crate::cli::ListArgs;
use crate::output;

/// Print the keys of a service, with values when `--expand` is set
pub async fn run(args: ListArgs, store: &dyn SecretStore, out: &mut dyn Write) -> Result<()> {
    let service = normalize_service(&args.service)?;

    let secrets = store
        .read_all(&service, args.version.as_deref())
        .await
        .context("Failed to read")?;

    output::secrets_table(out, &secrets, args.expand)?;
    Ok(())
}
