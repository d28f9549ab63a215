use shapeguard_lookup::EndpointId;

use crate::cmd::{build_lookup, read_payload, runtime, ValidateArgs};
use crate::exit::{lookup_error, outcome_code, CliResult};
use crate::output::{print_report, OutputFormat};

pub fn run(args: ValidateArgs, format: OutputFormat) -> CliResult<i32> {
    let endpoint =
        EndpointId::parse(&args.endpoint).map_err(|err| lookup_error("endpoint", err))?;
    let payload = read_payload(&args.payload)?;
    let lookup = build_lookup(&args.schemas, args.max_depth, None)?;

    let report = runtime()?
        .block_on(lookup.validate(&endpoint, &payload))
        .map_err(|err| lookup_error("validation failed", err))?;

    tracing::info!(%endpoint, outcome = %report.outcome(), "validated payload");
    print_report(&report, Some(&endpoint), format);
    Ok(outcome_code(report.outcome()))
}
