use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tracker",
    about = "Inspect and edit work items on a tracker server",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Config file (default: <config dir>/tracker/config.json)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Server base URL, overrides config and TRACKER_URL")]
    pub url: Option<String>,

    #[arg(long, global = true, help = "Bearer token, overrides config and TRACKER_TOKEN")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show a work item's fields")]
    Show {
        #[arg(help = "Work item URI or PROJECT/ID")]
        reference: String,
    },

    #[command(about = "List linked work items")]
    Links {
        #[arg(help = "Work item URI or PROJECT/ID")]
        reference: String,

        #[arg(long = "role", help = "Role to include, or ~role to exclude (repeatable)")]
        roles: Vec<String>,

        #[arg(long, help = "Follow back links instead of forward links")]
        back: bool,
    },

    #[command(about = "Set fields and save them in one update")]
    Set {
        #[arg(help = "Work item URI or PROJECT/ID")]
        reference: String,

        #[arg(required = true, help = "field=value pairs; value is JSON or a bare word, null clears")]
        assignments: Vec<String>,
    },

    #[command(about = "Move a work item to another status")]
    Status {
        #[arg(help = "Work item URI or PROJECT/ID")]
        reference: String,

        #[arg(help = "Target status id")]
        status: String,
    },

    #[command(about = "List available workflow actions, or perform one")]
    Actions {
        #[arg(help = "Work item URI or PROJECT/ID")]
        reference: String,

        #[arg(long, help = "Native id or name of the action to perform")]
        perform: Option<String>,
    },
}
