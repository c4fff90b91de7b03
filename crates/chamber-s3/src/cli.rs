//! CLI argument parsing with clap

use chamber_store::config::{
    BUCKET_ENV, DEFAULT_NUM_RETRIES, DEFAULT_PREFIX, ENDPOINT_ENV, PREFIX_ENV, REGION_ENV,
};
use chamber_store::StoreConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// chamber-s3 - per-service secrets in versioned S3 objects
#[derive(Parser, Debug)]
#[command(name = "chamber-s3")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// S3 bucket holding the secrets
    #[arg(short, long, global = true, env = BUCKET_ENV)]
    pub bucket: Option<String>,

    /// Object name prefix
    #[arg(long, global = true, env = PREFIX_ENV, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Number of retries we'll make before giving up
    #[arg(short, long, global = true, default_value_t = DEFAULT_NUM_RETRIES)]
    pub retries: u32,

    /// AWS region (takes priority over instance metadata and AWS_REGION)
    #[arg(long, global = true, env = REGION_ENV)]
    pub region: Option<String>,

    /// Custom S3-compatible endpoint (e.g., MinIO)
    #[arg(long, global = true, env = ENDPOINT_ENV)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Store configuration from the global flags
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.bucket.clone().unwrap_or_default())
            .with_prefix(self.prefix.clone())
            .with_num_retries(self.retries)
            .with_region_override(self.region.clone().filter(|r| !r.is_empty()))
            .with_endpoint(self.endpoint.clone().filter(|e| !e.is_empty()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a specific secret
    Read(ReadArgs),

    /// Write a single secret, keeping the service's other secrets
    Write(WriteArgs),

    /// Replace all secrets of a service with a JSON object read from stdin
    Writeall(WriteAllArgs),

    /// List the secrets set for a service
    List(ListArgs),

    /// Import secrets from a JSON file
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Service name
    pub service: String,

    /// Secret key
    pub key: String,

    /// Version id of the secrets document (defaults to latest)
    #[arg(long)]
    pub version: Option<String>,

    /// Only print the secret
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Service name
    pub service: String,

    /// Secret key
    pub key: String,

    /// Secret value, or `-` to read it from stdin
    pub value: String,
}

#[derive(Args, Debug)]
pub struct WriteAllArgs {
    /// Service name
    pub service: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Service name
    pub service: String,

    /// Version id of the secrets document (defaults to latest)
    #[arg(long)]
    pub version: Option<String>,

    /// Expand the list with secret values
    #[arg(short, long)]
    pub expand: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Service name
    pub service: String,

    /// JSON file to import, or `-` for stdin
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_read_with_globals() {
        let cli = Cli::try_parse_from([
            "chamber-s3",
            "--bucket",
            "secrets",
            "-r",
            "3",
            "read",
            "MyApp",
            "DB_PASSWORD",
            "--version",
            "abc123",
            "-q",
        ])
        .unwrap();

        let config = cli.store_config();
        assert_eq!(config.bucket, "secrets");
        assert_eq!(config.num_retries, 3);
        assert_eq!(config.prefix, DEFAULT_PREFIX);

        match cli.command {
            Commands::Read(args) => {
                assert_eq!(args.service, "MyApp");
                assert_eq!(args.key, "DB_PASSWORD");
                assert_eq!(args.version.as_deref(), Some("abc123"));
                assert!(args.quiet);
            }
            other => panic!("expected read, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chamber-s3",
            "list",
            "myapp",
            "-e",
            "--prefix",
            "",
            "--region",
            "eu-west-1",
        ])
        .unwrap();

        let config = cli.store_config();
        assert_eq!(config.prefix, "");
        assert_eq!(config.region_override.as_deref(), Some("eu-west-1"));
        assert!(matches!(cli.command, Commands::List(ListArgs { expand: true, .. })));
    }

    #[test]
    fn test_parse_requires_arguments() {
        assert!(Cli::try_parse_from(["chamber-s3", "read", "myapp"]).is_err());
        assert!(Cli::try_parse_from(["chamber-s3", "import", "myapp"]).is_err());
    }

    #[test]
    #[serial]
    fn test_store_config_from_env() {
        std::env::set_var(BUCKET_ENV, "env-bucket");
        std::env::set_var(ENDPOINT_ENV, "http://localhost:9000");
        std::env::set_var(REGION_ENV, "");

        let cli = Cli::try_parse_from(["chamber-s3", "list", "myapp"]).unwrap();
        let config = cli.store_config();

        std::env::remove_var(BUCKET_ENV);
        std::env::remove_var(ENDPOINT_ENV);
        std::env::remove_var(REGION_ENV);

        assert_eq!(config.bucket, "env-bucket");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(config.region_override.is_none());
    }

    #[test]
    #[serial]
    fn test_flags_override_env() {
        std::env::set_var(BUCKET_ENV, "env-bucket");

        let cli =
            Cli::try_parse_from(["chamber-s3", "-b", "flag-bucket", "list", "myapp"]).unwrap();

        std::env::remove_var(BUCKET_ENV);

        assert_eq!(cli.store_config().bucket, "flag-bucket");
    }
}
