use clap::{Parser, Subcommand};
use clonepin_migrate::{
    init_tracing, run_add_parent_comment_id, run_all, run_create_follow_table, run_inspect,
    settings_or_exit, ToolArgs,
};
use std::process::ExitCode;

/// ClonePinterest Database Maintenance
///
/// Provisions and migrates the schema objects the web application expects
/// in its SQLite database. Every command is safe to run more than once.
#[derive(Parser, Debug)]
#[command(name = "clonepin-migrate")]
#[command(about = "Schema maintenance for the ClonePinterest database", long_about = None)]
struct Cli {
    #[command(flatten)]
    tool: ToolArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the Follows table and its unique index
    Follows,
    /// Add the ParentCommentId column to Comments
    ParentComment,
    /// Show the state of the managed schema objects
    Inspect {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run every procedure in order, stopping at the first failure
    All,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let settings = match settings_or_exit(cli.tool) {
        Ok(settings) => settings,
        Err(code) => return code,
    };

    match cli.command {
        Command::Follows => run_create_follow_table(&settings),
        Command::ParentComment => run_add_parent_comment_id(&settings),
        Command::Inspect { json } => run_inspect(&settings, json),
        Command::All => run_all(&settings),
    }
}
