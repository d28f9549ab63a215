use shapeguard_lookup::{SchemaLookup, ValidationReport, ValidationRequest};

use crate::cmd::{build_lookup, parse_duration, read_input, runtime, BatchArgs};
use crate::exit::{lookup_error, outcome_code, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_report, OutputFormat};

pub fn run(args: BatchArgs, format: OutputFormat) -> CliResult<i32> {
    let cache_ttl = parse_duration(&args.cache_ttl)?;
    let requests = parse_requests(&read_input(&args.input)?)?;
    let lookup = build_lookup(&args.schemas, args.max_depth, Some(cache_ttl))?;

    let reports = runtime()?.block_on(validate_all(&lookup, &requests))?;

    let mut code = SUCCESS;
    let mut matched = 0usize;
    for (request, report) in requests.iter().zip(&reports) {
        print_report(report, Some(&request.endpoint_identifier), format);
        if report.is_match() {
            matched += 1;
        }
        code = code.max(outcome_code(report.outcome()));
    }

    tracing::info!(
        total = reports.len(),
        matched,
        failed = reports.len() - matched,
        "batch complete"
    );
    Ok(code)
}

async fn validate_all(
    lookup: &SchemaLookup,
    requests: &[ValidationRequest],
) -> CliResult<Vec<ValidationReport>> {
    let mut reports = Vec::with_capacity(requests.len());
    for request in requests {
        let report = lookup.handle(request).await.map_err(|err| {
            lookup_error(
                &format!("validation failed for {}", request.endpoint_identifier),
                err,
            )
        })?;
        reports.push(report);
    }
    Ok(reports)
}

fn parse_requests(input: &str) -> CliResult<Vec<ValidationRequest>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|err| {
                CliError::new(
                    DATA_INVALID,
                    format!("line {}: invalid request: {err}", index + 1),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_requests_and_skips_blank_lines() {
        let input = concat!(
            r#"{"endpointIdentifier":"/users","payload":{"id":1}}"#,
            "\n\n",
            r#"{"endpointIdentifier":"orders/","payload":[]}"#,
            "\n"
        );

        let requests = parse_requests(input).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].endpoint_identifier.as_str(), "/orders");
    }

    #[test]
    fn reports_the_offending_line() {
        let input = concat!(
            r#"{"endpointIdentifier":"/users","payload":{}}"#,
            "\n",
            r#"{"payload":{}}"#
        );

        let err = parse_requests(input).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("line 2:"), "{}", err.message);
    }
}
