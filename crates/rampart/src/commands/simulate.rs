//! `rampart simulate` -- packet verdict simulation against a file.

use rampart_core::{PacketQuery, evaluate};

use crate::cli::SimulateArgs;
use crate::error::CliError;

pub fn handle(args: &SimulateArgs) -> Result<(), CliError> {
    let config = super::load_config_file(&args.file)?;

    let query = PacketQuery {
        src_ip: args.src,
        dst_ip: args.dst,
        protocol: args.protocol,
        dest_port: args.port,
        src_zone: args.src_zone.clone(),
        dst_zone: args.dst_zone.clone(),
    };
    let verdict = evaluate(&config, &query);

    let rendered = serde_json::to_string_pretty(&verdict)
        .map_err(|source| CliError::Encode { source })?;
    println!("{rendered}");
    Ok(())
}
