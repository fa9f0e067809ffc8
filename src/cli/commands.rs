//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paged service invocation CLI
#[derive(Parser, Debug)]
#[command(name = "paged-invoke")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service: built-in name (e.g. ec2) or definition file (YAML)
    #[arg(short, long, global = true)]
    pub service: Option<PathBuf>,

    /// Override the service endpoint
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Invoke an operation, following pagination
    Invoke {
        /// Operation or command name (e.g. DetachVolume or Dismount-EC2Volume)
        operation: String,

        /// Parameter as Name=Value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Parameters as a JSON object
        #[arg(long)]
        params_json: Option<String>,

        /// Output rule: '*' for the whole response, a field name, or '^Param'
        #[arg(long)]
        select: Option<String>,

        /// Echo the operation's pass-thru parameter (deprecated, use --select '^Param')
        #[arg(long)]
        pass_thru: bool,

        /// Start from this cursor and fetch a single page
        #[arg(long)]
        next_token: Option<String>,

        /// Fetch a single page only
        #[arg(long)]
        no_auto_iteration: bool,

        /// Skip confirmation prompts
        #[arg(long)]
        force: bool,

        /// Write arrays as a single document instead of one per element
        #[arg(long)]
        no_enumerate: bool,
    },

    /// List built-in services
    List,

    /// List the operations of a service
    Operations,

    /// Validate a service definition file
    Validate {
        /// Definition file (YAML)
        file: PathBuf,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse a `Name=Value` pair
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid Name=Value: no '=' found in '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid Name=Value: empty name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
