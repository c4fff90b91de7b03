//! Read command

use anyhow::{Context, Result};
use chamber_store::SecretStore;
use std::io::Write;

use super::{normalize_key, normalize_service};
use crate::cli::ReadArgs;
use crate::output;

/// Print one secret, or only its value with `--quiet`
pub async fn run(args: ReadArgs, store: &dyn SecretStore, out: &mut dyn Write) -> Result<()> {
    let service = normalize_service(&args.service)?;
    let key = normalize_key(&args.key)?;

    let (value, meta) = store
        .read(&service, &key, args.version.as_deref())
        .await
        .context("Failed to read")?;

    if args.quiet {
        writeln!(out, "{}", value)?;
        return Ok(());
    }

    output::secret_table(out, &key, &value, &meta)?;
    Ok(())
}
