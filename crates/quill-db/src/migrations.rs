use rusqlite::Connection;
use tracing::info;

use crate::Result;

/// Millisecond-precision UTC timestamp in RFC 3339 form.
pub(crate) const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, messages)");
        conn.execute_batch(&format!(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT ({NOW}),
                updated_at  TEXT NOT NULL DEFAULT ({NOW})
            );

            -- author is a reference by value: checked on write, not a FOREIGN KEY,
            -- so deleting a user leaves their messages in place.
            CREATE TABLE messages (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                body        TEXT NOT NULL,
                author      TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT ({NOW}),
                updated_at  TEXT NOT NULL DEFAULT ({NOW})
            );

            CREATE INDEX idx_messages_author ON messages(author);
            CREATE INDEX idx_messages_title ON messages(title);

            INSERT INTO schema_version (version) VALUES (1);
            "
        ))?;
    }

    info!("Database migrations complete");
    Ok(())
}
