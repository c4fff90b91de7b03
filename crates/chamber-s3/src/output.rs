//! Terminal output utilities

use chamber_store::{Secrets, SecretsMetadata};
use chrono::{DateTime, Local, Utc};
use console::style;
use std::io::{self, Write};
use tabled::{settings::Style, Table, Tabled};

/// Short format for printing timestamps
pub const SHORT_TIME_FORMAT: &str = "%m-%d %H:%M:%S";

/// Print a success message
pub fn success(out: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("✓").green().bold(), msg)
}

/// Render a store timestamp in local time, `?` when the store did not report one
pub fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.with_timezone(&Local).format(SHORT_TIME_FORMAT).to_string())
        .unwrap_or_else(|| "?".to_string())
}

#[derive(Tabled)]
struct SecretRow {
    key: String,
    value: String,
    version: String,
    #[tabled(rename = "last modified")]
    last_modified: String,
}

#[derive(Tabled)]
struct ListRow {
    key: String,
    version: String,
    #[tabled(rename = "last modified")]
    last_modified: String,
}

#[derive(Tabled)]
struct ExpandedListRow {
    key: String,
    version: String,
    #[tabled(rename = "last modified")]
    last_modified: String,
    value: String,
}

/// Print one secret with the metadata of the version it was read from
pub fn secret_table(
    out: &mut dyn Write,
    key: &str,
    value: &str,
    meta: &SecretsMetadata,
) -> io::Result<()> {
    let mut table = Table::new([SecretRow {
        key: key.to_string(),
        value: value.to_string(),
        version: meta.version.clone(),
        last_modified: format_time(meta.last_modified),
    }]);
    table.with(Style::sharp());
    writeln!(out, "{}", table)
}

/// Print every key of a document, optionally with values
pub fn secrets_table(out: &mut dyn Write, secrets: &Secrets, show_values: bool) -> io::Result<()> {
    let version = &secrets.meta.version;
    let mtime = format_time(secrets.meta.last_modified);

    let mut table = if show_values {
        Table::new(secrets.secrets.iter().map(|(key, value)| ExpandedListRow {
            key: key.clone(),
            version: version.clone(),
            last_modified: mtime.clone(),
            value: value.clone(),
        }))
    } else {
        Table::new(secrets.secrets.keys().map(|key| ListRow {
            key: key.clone(),
            version: version.clone(),
            last_modified: mtime.clone(),
        }))
    };
    table.with(Style::sharp());
    writeln!(out, "{}", table)
}
