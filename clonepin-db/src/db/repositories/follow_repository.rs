use chrono::Utc;
use clonepin_types::{format_timestamp, parse_timestamp, truncate_to_ticks, Follow};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row};

use crate::db::DbPool;
use crate::error::Result;

pub struct FollowRepository {
    pool: DbPool,
}

impl FollowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn row_to_follow(row: &Row) -> rusqlite::Result<Follow> {
        let created_at: String = row.get(3)?;
        Ok(Follow {
            id: row.get(0)?,
            follower_id: row.get(1)?,
            following_id: row.get(2)?,
            created_at: parse_timestamp(&created_at)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        })
    }

    /// Check if `follower_id` is following `following_id`
    pub fn is_following(&self, follower_id: i64, following_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            r#"SELECT COUNT(*) FROM "Follows" WHERE "FollowerId" = ? AND "FollowingId" = ?"#,
            (follower_id, following_id),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Record that `follower_id` follows `following_id`.
    ///
    /// A repeated pair violates the unique index and is returned as an error;
    /// see [`crate::MaintenanceError::is_constraint_violation`].
    pub fn follow(&self, follower_id: i64, following_id: i64) -> Result<Follow> {
        let conn = self.pool.get()?;
        let created_at = truncate_to_ticks(Utc::now());

        conn.execute(
            r#"INSERT INTO "Follows" ("FollowerId", "FollowingId", "CreatedAt") VALUES (?, ?, ?)"#,
            (follower_id, following_id, format_timestamp(&created_at)),
        )?;

        Ok(Follow {
            id: conn.last_insert_rowid(),
            follower_id,
            following_id,
            created_at,
        })
    }

    /// Remove the edge; returns the number of rows deleted (0 or 1).
    pub fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            r#"DELETE FROM "Follows" WHERE "FollowerId" = ? AND "FollowingId" = ?"#,
            (follower_id, following_id),
        )?;
        Ok(rows_affected)
    }

    pub fn get(&self, follower_id: i64, following_id: i64) -> Result<Option<Follow>> {
        let conn = self.pool.get()?;
        let follow = conn
            .query_row(
                r#"SELECT "Id", "FollowerId", "FollowingId", "CreatedAt" FROM "Follows"
                   WHERE "FollowerId" = ? AND "FollowingId" = ?"#,
                (follower_id, following_id),
                Self::row_to_follow,
            )
            .optional()?;
        Ok(follow)
    }

    /// Users that `user_id` follows, most recent first
    pub fn following_of(&self, user_id: i64) -> Result<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            r#"SELECT "FollowingId" FROM "Follows" WHERE "FollowerId" = ?
               ORDER BY "CreatedAt" DESC, "Id" DESC"#,
        )?;

        let following = stmt
            .query_map([user_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(following)
    }

    /// Users that follow `user_id`, most recent first
    pub fn followers_of(&self, user_id: i64) -> Result<Vec<i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            r#"SELECT "FollowerId" FROM "Follows" WHERE "FollowingId" = ?
               ORDER BY "CreatedAt" DESC, "Id" DESC"#,
        )?;

        let followers = stmt
            .query_map([user_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(followers)
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(r#"SELECT COUNT(*) FROM "Follows""#, [], |row| row.get(0))?;
        Ok(count)
    }
}
