use clap::Parser;
use clonepin_migrate::{init_tracing, run_inspect, settings_or_exit, ToolArgs};
use std::process::ExitCode;

/// Database Schema Inspector
///
/// Reports whether the Follows table, its unique index and the
/// Comments.ParentCommentId column are present.
#[derive(Parser, Debug)]
#[command(name = "inspect-db")]
#[command(about = "Inspect the ClonePinterest database schema", long_about = None)]
struct Args {
    #[command(flatten)]
    tool: ToolArgs,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match settings_or_exit(args.tool) {
        Ok(settings) => run_inspect(&settings, args.json),
        Err(code) => code,
    }
}
