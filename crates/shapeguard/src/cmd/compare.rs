use shapeguard_lookup::ValidationReport;
use shapeguard_schema::{CompareConfig, Comparator, SchemaDocument};

use crate::cmd::{read_input, read_payload, CompareArgs};
use crate::exit::{outcome_code, CliResult};
use crate::output::{print_report, OutputFormat};

pub fn run(args: CompareArgs, format: OutputFormat) -> CliResult<i32> {
    let document = SchemaDocument::Text(read_input(&args.schema)?);
    let payload = read_payload(&args.payload)?;

    let comparator = Comparator::with_config(CompareConfig {
        max_depth: args.max_depth,
    });
    let report = ValidationReport {
        result: comparator.compare_document(&document, &payload),
        schema: Some(document.to_value()),
    };

    tracing::info!(
        schema = %args.schema.display(),
        outcome = %report.outcome(),
        "compared payload"
    );
    print_report(&report, None, format);
    Ok(outcome_code(report.outcome()))
}
