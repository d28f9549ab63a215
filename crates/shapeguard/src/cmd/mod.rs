use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use serde_json::Value;
use shapeguard_lookup::{
    DirectoryStore, LookupConfig, MemoryCache, SchemaCache, SchemaLookup,
};
use shapeguard_schema::CompareConfig;

use crate::exit::{io_error, lookup_error, CliError, CliResult, DATA_INVALID, INTERNAL, USAGE};
use crate::output::OutputFormat;

pub mod batch;
pub mod compare;
pub mod endpoints;
pub mod validate;
pub mod version;

const DEFAULT_MAX_DEPTH: &str = "128";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one payload against the schema registered for an endpoint.
    Validate(ValidateArgs),
    /// Validate newline-delimited requests against a schema directory.
    Batch(BatchArgs),
    /// Compare a payload against a schema file directly.
    Compare(CompareArgs),
    /// List endpoints registered in a schema directory.
    Endpoints(EndpointsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Validate(args) => validate::run(args, format),
        Command::Batch(args) => batch::run(args, format),
        Command::Compare(args) => compare::run(args, format),
        Command::Endpoints(args) => endpoints::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// JSON payload.
    #[arg(long)]
    pub json: Option<String>,
    /// Read the JSON payload from a file (`-` for stdin).
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Endpoint identifier (e.g. /users/address).
    pub endpoint: String,
    /// Directory of `*.schema.json` files.
    #[arg(long, value_name = "DIR", env = "SHAPEGUARD_SCHEMA_DIR")]
    pub schemas: PathBuf,
    #[command(flatten)]
    pub payload: PayloadArgs,
    /// Maximum nesting depth compared before giving up.
    #[arg(long, default_value = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File of newline-delimited `{"endpointIdentifier", "payload"}` requests (`-` for stdin).
    pub input: PathBuf,
    /// Directory of `*.schema.json` files.
    #[arg(long, value_name = "DIR", env = "SHAPEGUARD_SCHEMA_DIR")]
    pub schemas: PathBuf,
    /// Maximum nesting depth compared before giving up.
    #[arg(long, default_value = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// How long resolved schemas stay cached (e.g. 30s, 5m, 1h).
    #[arg(long, default_value = "1h")]
    pub cache_ttl: String,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Schema document file.
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,
    #[command(flatten)]
    pub payload: PayloadArgs,
    /// Maximum nesting depth compared before giving up.
    #[arg(long, default_value = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

#[derive(Args, Debug)]
pub struct EndpointsArgs {
    /// Directory of `*.schema.json` files.
    #[arg(long, value_name = "DIR", env = "SHAPEGUARD_SCHEMA_DIR")]
    pub schemas: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Bad inline JSON is a usage error; a bad payload file is invalid data.
pub(crate) fn read_payload(args: &PayloadArgs) -> CliResult<Value> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
    }
    if let Some(path) = &args.file {
        let text = read_input(path)?;
        return serde_json::from_str(&text).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("{} is not valid JSON: {err}", path.display()),
            )
        });
    }
    Err(CliError::new(USAGE, "one of --json or --file is required"))
}

pub(crate) fn read_input(path: &Path) -> CliResult<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| io_error("failed reading stdin", err))?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}

pub(crate) fn build_lookup(
    schemas: &Path,
    max_depth: usize,
    cache_ttl: Option<Duration>,
) -> CliResult<SchemaLookup> {
    let store = Arc::new(
        DirectoryStore::from_directory(schemas)
            .map_err(|err| lookup_error("schema directory", err))?,
    );
    let cache: Arc<dyn SchemaCache> = Arc::new(MemoryCache::new());
    let config = LookupConfig {
        cache_ttl,
        compare: CompareConfig { max_depth },
        ..LookupConfig::default()
    };
    Ok(SchemaLookup::with_config(store, cache, config))
}

pub(crate) fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("failed starting runtime: {err}")))
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    if let Some(num) = input.strip_suffix("ms") {
        return Ok(Duration::from_millis(parse_duration_value(num, input)?));
    }

    let (number, unit_secs) = if let Some(num) = input.strip_suffix('s') {
        (num, 1)
    } else if let Some(num) = input.strip_suffix('m') {
        (num, 60)
    } else if let Some(num) = input.strip_suffix('h') {
        (num, 3600)
    } else {
        (input, 1)
    };

    let value = parse_duration_value(number, input)?;
    Ok(Duration::from_secs(value.saturating_mul(unit_secs)))
}

fn parse_duration_value(number: &str, input: &str) -> CliResult<u64> {
    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn inline_payload_must_be_json() {
        let args = PayloadArgs {
            json: Some("{\"a\":1}".to_string()),
            file: None,
        };
        assert_eq!(read_payload(&args).unwrap(), serde_json::json!({ "a": 1 }));

        let bad = PayloadArgs {
            json: Some("{".to_string()),
            file: None,
        };
        assert_eq!(read_payload(&bad).unwrap_err().code, USAGE);
    }
}
