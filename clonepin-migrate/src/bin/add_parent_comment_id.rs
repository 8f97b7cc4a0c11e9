//! Add the nullable `ParentCommentId` column to `Comments`.
//!
//! Safe to re-run: an existing column is reported and treated as success.
//!
//! Run with: cargo run --bin add-parent-comment-id [-- --database <path> --script <file>]
use clap::Parser;
use clonepin_migrate::{init_tracing, run_add_parent_comment_id, settings_or_exit, ToolArgs};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "add-parent-comment-id")]
#[command(about = "Add threaded-reply support to the Comments table")]
struct Args {
    #[command(flatten)]
    tool: ToolArgs,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match settings_or_exit(args.tool) {
        Ok(settings) => run_add_parent_comment_id(&settings),
        Err(code) => code,
    }
}
