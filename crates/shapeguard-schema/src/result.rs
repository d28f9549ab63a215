use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

pub const MATCH_MESSAGE: &str = "Payload structure matches the schema perfectly!";
pub const MISMATCH_MESSAGE: &str = "Payload structure does not match the schema";
pub const MALFORMED_MESSAGE: &str = "Invalid schema format";
pub const MALFORMED_DIFFERENCE: &str = "Schema is not valid JSON";
pub const NOT_FOUND_MESSAGE: &str = "Schema not found for the specified endpoint";
pub const NOT_FOUND_DIFFERENCE: &str = "No schema exists for this endpoint";
pub const INTERNAL_FAILURE_MESSAGE: &str = "Error occurred during comparison";

/// Terminal classification of a validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Match,
    StructuralMismatch,
    SchemaMalformed,
    SchemaNotFound,
    InternalComparisonFailure,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::StructuralMismatch => "structural_mismatch",
            Self::SchemaMalformed => "schema_malformed",
            Self::SchemaNotFound => "schema_not_found",
            Self::InternalComparisonFailure => "internal_comparison_failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of one comparison. `differences` is empty exactly when
/// `is_match` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub is_match: bool,
    pub message: String,
    pub differences: Vec<String>,
    pub outcome: Outcome,
}

impl ComparisonResult {
    /// Build the verdict for a completed walk.
    pub fn from_differences(differences: Vec<String>) -> Self {
        if differences.is_empty() {
            Self {
                is_match: true,
                message: MATCH_MESSAGE.to_string(),
                differences,
                outcome: Outcome::Match,
            }
        } else {
            Self {
                is_match: false,
                message: MISMATCH_MESSAGE.to_string(),
                differences,
                outcome: Outcome::StructuralMismatch,
            }
        }
    }

    pub fn schema_malformed() -> Self {
        Self::failure(
            MALFORMED_MESSAGE,
            MALFORMED_DIFFERENCE.to_string(),
            Outcome::SchemaMalformed,
        )
    }

    pub fn schema_not_found() -> Self {
        Self::failure(
            NOT_FOUND_MESSAGE,
            NOT_FOUND_DIFFERENCE.to_string(),
            Outcome::SchemaNotFound,
        )
    }

    pub fn internal_failure(description: impl fmt::Display) -> Self {
        Self::failure(
            INTERNAL_FAILURE_MESSAGE,
            format!("Comparison error: {description}"),
            Outcome::InternalComparisonFailure,
        )
    }

    fn failure(message: &str, difference: String, outcome: Outcome) -> Self {
        Self {
            is_match: false,
            message: message.to_string(),
            differences: vec![difference],
            outcome,
        }
    }
}

impl From<SchemaError> for ComparisonResult {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Malformed(_) => Self::schema_malformed(),
            other => Self::internal_failure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_differences_is_a_match() {
        let result = ComparisonResult::from_differences(Vec::new());
        assert!(result.is_match);
        assert_eq!(result.message, MATCH_MESSAGE);
        assert_eq!(result.outcome, Outcome::Match);
    }

    #[test]
    fn sentinel_results_are_distinguishable() {
        let not_found = ComparisonResult::schema_not_found();
        assert!(!not_found.is_match);
        assert_eq!(not_found.differences, vec![NOT_FOUND_DIFFERENCE]);
        assert_eq!(not_found.outcome, Outcome::SchemaNotFound);

        let malformed = ComparisonResult::schema_malformed();
        assert_eq!(malformed.message, MALFORMED_MESSAGE);
        assert_eq!(malformed.differences, vec![MALFORMED_DIFFERENCE]);
        assert_eq!(malformed.outcome, Outcome::SchemaMalformed);
    }

    #[test]
    fn schema_errors_convert_to_results() {
        let err = SchemaError::DepthExceeded {
            max: 2,
            path: ".a.b".to_string(),
        };
        let result = ComparisonResult::from(err);
        assert_eq!(result.outcome, Outcome::InternalComparisonFailure);
        assert_eq!(result.message, INTERNAL_FAILURE_MESSAGE);
        assert_eq!(
            result.differences,
            vec!["Comparison error: maximum nesting depth 2 exceeded at path \".a.b\""]
        );

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            ComparisonResult::from(SchemaError::from(parse_err)),
            ComparisonResult::schema_malformed()
        );
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(ComparisonResult::from_differences(vec![
            ".a: Missing required property".to_string(),
        ]))
        .unwrap();

        assert_eq!(value["isMatch"], false);
        assert_eq!(value["outcome"], "structural_mismatch");
        assert_eq!(value["differences"][0], ".a: Missing required property");
    }
}
