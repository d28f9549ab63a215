use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use shapeguard_lookup::{EndpointId, ValidationReport};
use shapeguard_schema::REASON_PREFIXES;

const REPORT_SCHEMA_ID: &str =
    "https://schemas.3leaps.dev/shapeguard/cli/v1/validation-report.schema.json";
const ENDPOINTS_SCHEMA_ID: &str =
    "https://schemas.3leaps.dev/shapeguard/cli/v1/endpoint-list.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    schema_id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<&'a EndpointId>,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

#[derive(Serialize)]
struct EndpointsOutput<'a> {
    schema_id: &'static str,
    count: usize,
    endpoints: &'a [EndpointId],
}

pub fn print_report(report: &ValidationReport, endpoint: Option<&EndpointId>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ReportOutput {
                schema_id: REPORT_SCHEMA_ID,
                endpoint,
                report,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            if let Some(endpoint) = endpoint {
                println!("endpoint: {endpoint}");
            }
            println!("{}", report.result.message);
            if !report.result.differences.is_empty() {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["#", "PATH", "REASON"]);
                for (index, difference) in report.result.differences.iter().enumerate() {
                    let (path, reason) = split_difference(difference);
                    table.add_row(vec![
                        (index + 1).to_string(),
                        display_path(path).to_string(),
                        reason.to_string(),
                    ]);
                }
                println!("{table}");
            }
        }
        OutputFormat::Pretty => {
            let prefix = endpoint.map(|e| format!("{e} ")).unwrap_or_default();
            println!(
                "{prefix}[{}] {}",
                report.result.outcome, report.result.message
            );
            for difference in &report.result.differences {
                println!("  - {difference}");
            }
        }
        OutputFormat::Raw => {
            println!("{}", report.result.outcome);
        }
    }
}

pub fn print_endpoints(endpoints: &[EndpointId], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EndpointsOutput {
                schema_id: ENDPOINTS_SCHEMA_ID,
                count: endpoints.len(),
                endpoints,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ENDPOINT"]);
            for endpoint in endpoints {
                table.add_row(vec![endpoint.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for endpoint in endpoints {
                println!("{endpoint}");
            }
        }
    }
}

/// Split a difference entry into its path and reason at the first `": "`
/// that starts a comparator reason, so keys and values containing `": "`
/// stay on their side. Entries without a path (sentinel messages) return an
/// empty path.
fn split_difference(difference: &str) -> (&str, &str) {
    difference
        .match_indices(": ")
        .map(|(index, separator)| (&difference[..index], &difference[index + separator.len()..]))
        .find(|(path, reason)| {
            (path.is_empty() || is_path(path))
                && REASON_PREFIXES.iter().any(|prefix| reason.starts_with(prefix))
        })
        .unwrap_or(("", difference))
}

fn is_path(candidate: &str) -> bool {
    candidate.starts_with('.') || candidate.starts_with('[')
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_addressed_differences() {
        assert_eq!(
            split_difference(".user.addresses[2].zip: Missing required property"),
            (".user.addresses[2].zip", "Missing required property")
        );
        assert_eq!(
            split_difference(": Expected object but got array"),
            ("", "Expected object but got array")
        );
    }

    #[test]
    fn separators_inside_keys_and_values_stay_put() {
        assert_eq!(
            split_difference(".meta.a: b: Unexpected property not defined in schema"),
            (".meta.a: b", "Unexpected property not defined in schema")
        );
        assert_eq!(
            split_difference(r#".note: Expected integer but got string ("x: y")"#),
            (".note", r#"Expected integer but got string ("x: y")"#)
        );
    }

    #[test]
    fn sentinel_entries_have_no_path() {
        assert_eq!(
            split_difference("No schema exists for this endpoint"),
            ("", "No schema exists for this endpoint")
        );
        assert_eq!(
            split_difference("Comparison error: maximum nesting depth 2 exceeded"),
            ("", "Comparison error: maximum nesting depth 2 exceeded")
        );
    }

    #[test]
    fn root_path_is_labelled() {
        assert_eq!(display_path(""), "(root)");
        assert_eq!(display_path(".a"), ".a");
    }
}
