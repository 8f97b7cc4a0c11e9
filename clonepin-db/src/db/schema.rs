/// Names of the schema objects managed by the tools. They must match what the
/// web application's ORM expects.
pub const USERS_TABLE: &str = "Users";
pub const FOLLOWS_TABLE: &str = "Follows";
pub const FOLLOWS_UNIQUE_INDEX: &str = "IX_Follows_FollowerId_FollowingId";
pub const COMMENTS_TABLE: &str = "Comments";
pub const PARENT_COMMENT_COLUMN: &str = "ParentCommentId";
pub const COMMENTS_PARENT_INDEX: &str = "IX_Comments_ParentCommentId";

/// Directed follow edges between users
pub const CREATE_FOLLOWS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "Follows" (
    "Id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    "FollowerId" INTEGER NOT NULL,
    "FollowingId" INTEGER NOT NULL,
    "CreatedAt" TEXT NOT NULL,
    FOREIGN KEY("FollowerId") REFERENCES "Users"("Id") ON DELETE CASCADE,
    FOREIGN KEY("FollowingId") REFERENCES "Users"("Id") ON DELETE CASCADE
)
"#;

/// A user follows another user at most once
pub const CREATE_FOLLOWS_INDEX_SQL: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS "IX_Follows_FollowerId_FollowingId"
ON "Follows"("FollowerId", "FollowingId")
"#;

/// Bundled DDL batch adding `Comments.ParentCommentId`
pub const ADD_PARENT_COMMENT_ID_SQL: &str = include_str!("../../sql/add_parent_comment_id.sql");

/// Minimal stand-in for the tables the web application owns.
///
/// Only the columns the tools and repositories touch are declared. Used to
/// build throwaway databases in tests.
pub const FIXTURE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "Users" (
    "Id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    "Email" TEXT NOT NULL,
    "Username" TEXT NOT NULL,
    "CreatedAt" TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS "Comments" (
    "Id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    "PinId" INTEGER NOT NULL,
    "UserId" INTEGER NOT NULL,
    "Text" TEXT NOT NULL,
    "CreatedAt" TEXT NOT NULL,
    FOREIGN KEY("UserId") REFERENCES "Users"("Id") ON DELETE CASCADE
);
"#;

/// Sample rows for [`FIXTURE_SCHEMA`]
pub const FIXTURE_DATA: &str = r#"
INSERT INTO "Users" ("Id", "Email", "Username") VALUES
    (1, 'alice@example.com', 'alice'),
    (2, 'bob@example.com', 'bob'),
    (3, 'carol@example.com', 'carol');

INSERT INTO "Comments" ("Id", "PinId", "UserId", "Text", "CreatedAt") VALUES
    (1, 10, 1, 'Love this board', '2025-12-21 09:37:29.1234567'),
    (2, 10, 2, 'Where is this?', '2025-12-21 10:02:11.5000000');
"#;
