use std::fmt;
use std::io;

use shapeguard_lookup::LookupError;
use shapeguard_schema::Outcome;

// Process exit codes. Validation verdicts map through `outcome_code`.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const STORE_ERROR: i32 = 3;
pub const NOT_FOUND: i32 = 44;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit code for a validation verdict.
pub fn outcome_code(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Match => SUCCESS,
        Outcome::StructuralMismatch => FAILURE,
        Outcome::SchemaMalformed => DATA_INVALID,
        Outcome::SchemaNotFound => NOT_FOUND,
        Outcome::InternalComparisonFailure => INTERNAL,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn lookup_error(context: &str, err: LookupError) -> CliError {
    let code = match err {
        LookupError::InvalidEndpoint(_) => USAGE,
        LookupError::LoadFailed(_) => DATA_INVALID,
        LookupError::Store(_) => STORE_ERROR,
        LookupError::Cache(_) => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_outcome_has_a_distinct_code() {
        let codes = [
            outcome_code(Outcome::Match),
            outcome_code(Outcome::StructuralMismatch),
            outcome_code(Outcome::SchemaMalformed),
            outcome_code(Outcome::SchemaNotFound),
            outcome_code(Outcome::InternalComparisonFailure),
        ];
        for (i, code) in codes.iter().enumerate() {
            assert!(!codes[i + 1..].contains(code), "duplicate code {code}");
        }
        assert_eq!(codes[0], SUCCESS);
    }

    #[test]
    fn lookup_errors_map_to_codes() {
        let err = lookup_error("load", LookupError::LoadFailed("x".to_string()));
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(err.to_string(), "load: failed to load schema: x");

        let err = lookup_error("endpoint", LookupError::InvalidEndpoint(String::new()));
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn io_errors_map_to_codes() {
        let err = io_error(
            "read",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
