//! CLI argument parsing.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rampart_core::model::Protocol;

#[derive(Debug, Parser)]
#[command(
    name = "rampart",
    version,
    about = "Control plane for the rampart firewall",
    long_about = "Validates, stages, and applies firewall configuration through the\n\
                  rampartd enforcement daemon, with automatic rollback when a change\n\
                  breaks connectivity.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalOpts {
    /// Settings file (default: /etc/rampart/config.toml, then XDG)
    #[arg(long, env = "RAMPART_CONFIG", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the control-plane HTTP API against rampartd
    Serve(ServeArgs),

    /// Validate a configuration file
    Validate(ValidateArgs),

    /// Simulate a packet verdict against a configuration file
    Simulate(SimulateArgs),

    /// Show a unified diff between two configuration files
    Diff(DiffArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address override (host:port)
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// rampartd control endpoint override
    #[arg(long, value_name = "URL")]
    pub daemon: Option<String>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Configuration document (JSON)
    pub file: PathBuf,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Configuration document (JSON)
    pub file: PathBuf,

    /// Source IP address
    #[arg(long)]
    pub src: IpAddr,

    /// Destination IP address
    #[arg(long)]
    pub dst: IpAddr,

    /// Protocol (tcp, udp, icmp, any)
    #[arg(long, default_value = "tcp")]
    pub protocol: Protocol,

    /// Destination port
    #[arg(long)]
    pub port: Option<u16>,

    /// Skip zone resolution and use this source zone
    #[arg(long, value_name = "ZONE")]
    pub src_zone: Option<String>,

    /// Skip zone resolution and use this destination zone
    #[arg(long, value_name = "ZONE")]
    pub dst_zone: Option<String>,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Currently running configuration (JSON)
    pub running: PathBuf,

    /// Candidate configuration (JSON)
    pub staged: PathBuf,
}
