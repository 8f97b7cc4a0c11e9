//! Schema maintenance for the ClonePinterest SQLite database.
//!
//! Two procedures live here: [`provision::provision_follows`] creates the
//! `Follows` table with its unique pair index, and
//! [`migrate::add_parent_comment_column`] adds the self-referential
//! `Comments.ParentCommentId` column. Both are safe to run repeatedly.

pub mod config;
pub mod db;
pub mod error;
pub mod migrate;
pub mod provision;

pub use config::Settings;
pub use db::Database;
pub use error::{MaintenanceError, Result};
pub use migrate::{add_parent_comment_column, MigrationOutcome, ScriptSource};
pub use provision::{provision_follows, provision_follows_with, ProvisionReport, ProvisionStep};
