//! Create the `Follows` table and its unique `(FollowerId, FollowingId)` index.
//!
//! Run with: cargo run --bin create-follow-table [-- --database <path>]
use clap::Parser;
use clonepin_migrate::{init_tracing, run_create_follow_table, settings_or_exit, ToolArgs};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "create-follow-table")]
#[command(about = "Create the Follows table in the ClonePinterest database")]
struct Args {
    #[command(flatten)]
    tool: ToolArgs,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match settings_or_exit(args.tool) {
        Ok(settings) => run_create_follow_table(&settings),
        Err(code) => code,
    }
}
