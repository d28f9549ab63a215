use shapeguard_lookup::DirectoryStore;

use crate::cmd::EndpointsArgs;
use crate::exit::{lookup_error, CliResult, SUCCESS};
use crate::output::{print_endpoints, OutputFormat};

pub fn run(args: EndpointsArgs, format: OutputFormat) -> CliResult<i32> {
    let store = DirectoryStore::from_directory(&args.schemas)
        .map_err(|err| lookup_error("schema directory", err))?;
    print_endpoints(&store.endpoints(), format);
    Ok(SUCCESS)
}
