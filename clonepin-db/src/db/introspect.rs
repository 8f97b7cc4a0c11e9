//! Read-only queries against `sqlite_master` and `pragma_table_info`.

use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

use super::schema::{
    COMMENTS_PARENT_INDEX, COMMENTS_TABLE, FOLLOWS_TABLE, FOLLOWS_UNIQUE_INDEX,
    PARENT_COMMENT_COLUMN, USERS_TABLE,
};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub type_name: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub pk: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub name: String,
    pub exists: bool,
    pub rows: Option<i64>,
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub name: String,
    pub exists: bool,
    pub unique: bool,
}

/// State of every schema object the maintenance tools create or depend on.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    pub tables: Vec<TableReport>,
    pub indexes: Vec<IndexReport>,
    pub follows_provisioned: bool,
    pub parent_comment_column: bool,
}

impl SchemaReport {
    /// Both procedures have been applied.
    pub fn is_up_to_date(&self) -> bool {
        self.follows_provisioned && self.parent_comment_column
    }
}

pub fn table_exists(conn: &Connection, table_name: &str) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn index_exists(conn: &Connection, index_name: &str) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name=?",
        [index_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Whether the named index exists and is declared UNIQUE.
pub fn index_is_unique(conn: &Connection, index_name: &str) -> Result<bool> {
    let sql: Option<Option<String>> = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type='index' AND name=?",
            [index_name],
            |row| row.get(0),
        )
        .optional()?;

    Ok(sql
        .flatten()
        .map(|sql| sql.to_ascii_uppercase().contains("UNIQUE"))
        .unwrap_or(false))
}

/// Columns of `table_name` in declaration order. Empty if the table is missing.
pub fn table_columns(conn: &Connection, table_name: &str) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?) ORDER BY cid",
    )?;

    let columns = stmt
        .query_map([table_name], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                type_name: row.get(1)?,
                not_null: row.get::<_, i32>(2)? != 0,
                default_value: row.get(3)?,
                pk: row.get::<_, i32>(4)? != 0,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(columns)
}

pub fn column_exists(conn: &Connection, table_name: &str, column_name: &str) -> Result<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2 COLLATE NOCASE",
        [table_name, column_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn count_rows(conn: &Connection, table_name: &str) -> Result<i64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_identifier(table_name)),
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn table_report(conn: &Connection, table_name: &str) -> Result<TableReport> {
    let exists = table_exists(conn, table_name)?;
    let (rows, columns) = if exists {
        (
            Some(count_rows(conn, table_name)?),
            table_columns(conn, table_name)?,
        )
    } else {
        (None, Vec::new())
    };

    Ok(TableReport {
        name: table_name.to_string(),
        exists,
        rows,
        columns,
    })
}

fn index_report(conn: &Connection, index_name: &str) -> Result<IndexReport> {
    Ok(IndexReport {
        name: index_name.to_string(),
        exists: index_exists(conn, index_name)?,
        unique: index_is_unique(conn, index_name)?,
    })
}

/// Snapshot the tables, index and column the maintenance tools manage.
pub fn inspect_schema(conn: &Connection) -> Result<SchemaReport> {
    let tables = vec![
        table_report(conn, USERS_TABLE)?,
        table_report(conn, COMMENTS_TABLE)?,
        table_report(conn, FOLLOWS_TABLE)?,
    ];
    let indexes = vec![
        index_report(conn, FOLLOWS_UNIQUE_INDEX)?,
        index_report(conn, COMMENTS_PARENT_INDEX)?,
    ];

    let follows_provisioned =
        table_exists(conn, FOLLOWS_TABLE)? && index_is_unique(conn, FOLLOWS_UNIQUE_INDEX)?;
    let parent_comment_column = column_exists(conn, COMMENTS_TABLE, PARENT_COMMENT_COLUMN)?;

    Ok(SchemaReport {
        tables,
        indexes,
        follows_provisioned,
        parent_comment_column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::{FIXTURE_DATA, FIXTURE_SCHEMA};
    use crate::db::Database;

    fn fixture() -> Database {
        let db = Database::in_memory().expect("Failed to create database");
        let conn = db.connection().expect("Failed to get connection");
        conn.execute_batch(FIXTURE_SCHEMA)
            .expect("Failed to create fixture schema");
        conn.execute_batch(FIXTURE_DATA)
            .expect("Failed to seed fixture data");
        db
    }

    #[test]
    fn test_table_and_column_lookup() {
        let db = fixture();
        let conn = db.connection().unwrap();

        assert!(table_exists(&conn, "Users").unwrap());
        assert!(!table_exists(&conn, "Follows").unwrap());
        assert!(column_exists(&conn, "Comments", "Text").unwrap());
        assert!(column_exists(&conn, "Comments", "text").unwrap());
        assert!(!column_exists(&conn, "Comments", "ParentCommentId").unwrap());
        assert!(!column_exists(&conn, "Missing", "Id").unwrap());
    }

    #[test]
    fn test_table_columns_in_declaration_order() {
        let db = fixture();
        let conn = db.connection().unwrap();

        let columns = table_columns(&conn, "Users").unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Id", "Email", "Username", "CreatedAt"]);
        assert!(columns[0].pk);
        assert!(columns[1].not_null);
        assert_eq!(columns[3].default_value.as_deref(), Some("datetime('now')"));

        assert!(table_columns(&conn, "Missing").unwrap().is_empty());
    }

    #[test]
    fn test_count_rows_quotes_names() {
        let db = fixture();
        let conn = db.connection().unwrap();

        assert_eq!(count_rows(&conn, "Users").unwrap(), 3);
        assert_eq!(count_rows(&conn, "Comments").unwrap(), 2);
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_index_uniqueness() {
        let db = fixture();
        let conn = db.connection().unwrap();
        conn.execute_batch(
            r#"CREATE INDEX "IX_Plain" ON "Comments"("PinId");
               CREATE UNIQUE INDEX "IX_Unique" ON "Users"("Email");"#,
        )
        .unwrap();

        assert!(index_exists(&conn, "IX_Plain").unwrap());
        assert!(!index_is_unique(&conn, "IX_Plain").unwrap());
        assert!(index_is_unique(&conn, "IX_Unique").unwrap());
        assert!(!index_is_unique(&conn, "IX_Missing").unwrap());
    }

    #[test]
    fn test_inspect_fresh_fixture() {
        let db = fixture();
        let conn = db.connection().unwrap();

        let report = inspect_schema(&conn).unwrap();

        assert!(!report.follows_provisioned);
        assert!(!report.parent_comment_column);
        assert!(!report.is_up_to_date());

        let follows = report.tables.iter().find(|t| t.name == "Follows").unwrap();
        assert!(!follows.exists);
        assert_eq!(follows.rows, None);

        let users = report.tables.iter().find(|t| t.name == "Users").unwrap();
        assert_eq!(users.rows, Some(3));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["indexes"][0]["name"], "IX_Follows_FollowerId_FollowingId");
        assert_eq!(json["indexes"][0]["exists"], false);
    }
}
