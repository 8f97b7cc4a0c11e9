use clonepin_types::{parse_timestamp, Comment};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row};

use crate::db::DbPool;
use crate::error::Result;

const COMMENT_COLUMNS: &str =
    r#""Id", "PinId", "UserId", "Text", "CreatedAt", "ParentCommentId""#;

/// Reply threading over `Comments`. Requires the `ParentCommentId` migration.
pub struct CommentRepository {
    pool: DbPool,
}

impl CommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn row_to_comment(row: &Row) -> rusqlite::Result<Comment> {
        let created_at: String = row.get(4)?;
        Ok(Comment {
            id: row.get(0)?,
            pin_id: row.get(1)?,
            user_id: row.get(2)?,
            text: row.get(3)?,
            created_at: parse_timestamp(&created_at)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
            parent_comment_id: row.get(5)?,
        })
    }

    pub fn get(&self, id: i64) -> Result<Option<Comment>> {
        let conn = self.pool.get()?;
        let comment = conn
            .query_row(
                &format!(r#"SELECT {} FROM "Comments" WHERE "Id" = ?"#, COMMENT_COLUMNS),
                [id],
                Self::row_to_comment,
            )
            .optional()?;
        Ok(comment)
    }

    /// Point `comment_id` at `parent_id`, or detach it with `None`.
    ///
    /// Returns false if no such comment exists. Cycles are not checked.
    pub fn set_parent(&self, comment_id: i64, parent_id: Option<i64>) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            r#"UPDATE "Comments" SET "ParentCommentId" = ? WHERE "Id" = ?"#,
            (parent_id, comment_id),
        )?;
        Ok(rows_affected > 0)
    }

    /// Direct replies to `parent_id`, oldest first
    pub fn replies_to(&self, parent_id: i64) -> Result<Vec<Comment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            r#"SELECT {} FROM "Comments" WHERE "ParentCommentId" = ? ORDER BY "CreatedAt", "Id""#,
            COMMENT_COLUMNS
        ))?;

        let replies = stmt
            .query_map([parent_id], Self::row_to_comment)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(replies)
    }
}
