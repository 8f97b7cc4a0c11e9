//! Follow-table provisioner.
//!
//! Creates the `Follows` table and its unique `(FollowerId, FollowingId)`
//! index. Both statements use `IF NOT EXISTS`, so running against an already
//! provisioned database changes nothing.

use rusqlite::Connection;

use crate::db::introspect::{index_exists, table_exists};
use crate::db::schema::{
    CREATE_FOLLOWS_INDEX_SQL, CREATE_FOLLOWS_TABLE_SQL, FOLLOWS_TABLE, FOLLOWS_UNIQUE_INDEX,
};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    CreateTable,
    CreateIndex,
}

/// What the provisioner found before creating each object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProvisionReport {
    pub table_existed: bool,
    pub index_existed: bool,
}

impl ProvisionReport {
    /// Nothing had to be created.
    pub fn was_noop(&self) -> bool {
        self.table_existed && self.index_existed
    }
}

pub fn provision_follows(conn: &mut Connection) -> Result<ProvisionReport> {
    provision_follows_with(conn, |_| {})
}

/// Like [`provision_follows`], calling `on_step` before each statement runs.
///
/// Both statements share one transaction; on error nothing is committed.
pub fn provision_follows_with<F>(conn: &mut Connection, mut on_step: F) -> Result<ProvisionReport>
where
    F: FnMut(ProvisionStep),
{
    let tx = conn.transaction()?;
    let mut report = ProvisionReport::default();

    on_step(ProvisionStep::CreateTable);
    report.table_existed = table_exists(&tx, FOLLOWS_TABLE)?;
    tracing::debug!(existed = report.table_existed, "creating {} table", FOLLOWS_TABLE);
    tx.execute_batch(CREATE_FOLLOWS_TABLE_SQL)?;

    on_step(ProvisionStep::CreateIndex);
    report.index_existed = index_exists(&tx, FOLLOWS_UNIQUE_INDEX)?;
    tracing::debug!(existed = report.index_existed, "creating {} index", FOLLOWS_UNIQUE_INDEX);
    tx.execute_batch(CREATE_FOLLOWS_INDEX_SQL)?;

    tx.commit()?;
    tracing::info!(
        table_existed = report.table_existed,
        index_existed = report.index_existed,
        "follows table provisioned"
    );

    Ok(report)
}
