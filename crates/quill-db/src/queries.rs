use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use crate::migrations::NOW;
use crate::models::{MessageChanges, MessageRow, UserChanges, UserRow};
use crate::{Database, DbError, Result};

const USER_COLUMNS: &str = "id, username, password, created_at, updated_at";
const MESSAGE_COLUMNS: &str = "id, title, body, author, created_at, updated_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<UserRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if exists(&tx, "users", id)? {
                return Err(DbError::Duplicate(format!("user {} already exists", id)));
            }
            if query_user_by_username(&tx, username)?.is_some() {
                return Err(DbError::Duplicate(format!("username '{}' is taken", username)));
            }

            let row = tx.query_row(
                &format!(
                    "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)
                     RETURNING {USER_COLUMNS}"
                ),
                params![id, username, password_hash],
                map_user,
            )?;

            tx.commit()?;
            Ok(row)
        })
    }

    pub fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid"))?;
            let rows = stmt
                .query_map([], map_user)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Returns `None` when no user has this id.
    pub fn update_user(&self, id: &str, changes: UserChanges<'_>) -> Result<Option<UserRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if !exists(&tx, "users", id)? {
                return Ok(None);
            }
            if let Some(username) = changes.username {
                if let Some(holder) = query_user_by_username(&tx, username)? {
                    if holder.id != id {
                        return Err(DbError::Duplicate(format!("username '{}' is taken", username)));
                    }
                }
            }

            let row = tx.query_row(
                &format!(
                    "UPDATE users
                     SET username = COALESCE(?2, username),
                         password = COALESCE(?3, password),
                         updated_at = {NOW}
                     WHERE id = ?1
                     RETURNING {USER_COLUMNS}"
                ),
                params![id, changes.username, changes.password_hash],
                map_user,
            )?;

            tx.commit()?;
            Ok(Some(row))
        })
    }

    /// Returns whether a row was removed.
    pub fn delete_user(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    pub fn delete_users_by_usernames(&self, usernames: &[&str]) -> Result<usize> {
        self.with_conn(|conn| delete_where_in(conn, "users", "username", usernames))
    }

    // -- Messages --

    pub fn insert_message(&self, id: &str, title: &str, body: &str, author: &str) -> Result<MessageRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if exists(&tx, "messages", id)? {
                return Err(DbError::Duplicate(format!("message {} already exists", id)));
            }
            if !exists(&tx, "users", author)? {
                return Err(DbError::UnknownAuthor(author.to_string()));
            }

            let row = tx.query_row(
                &format!(
                    "INSERT INTO messages (id, title, body, author) VALUES (?1, ?2, ?3, ?4)
                     RETURNING {MESSAGE_COLUMNS}"
                ),
                params![id, title, body, author],
                map_message,
            )?;

            tx.commit()?;
            Ok(row)
        })
    }

    pub fn get_message(&self, id: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
                    [id],
                    map_message,
                )
                .optional()?;
            Ok(row)
        })
    }

    /// All messages in insertion order, optionally narrowed to one author.
    pub fn list_messages(&self, author: Option<&str>) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE ?1 IS NULL OR author = ?1
                 ORDER BY rowid"
            ))?;
            let rows = stmt
                .query_map([author], map_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Returns `None` when no message has this id. A missing message wins over
    /// an unknown author.
    pub fn update_message(&self, id: &str, changes: MessageChanges<'_>) -> Result<Option<MessageRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if !exists(&tx, "messages", id)? {
                return Ok(None);
            }
            if let Some(author) = changes.author {
                if !exists(&tx, "users", author)? {
                    return Err(DbError::UnknownAuthor(author.to_string()));
                }
            }

            let row = tx.query_row(
                &format!(
                    "UPDATE messages
                     SET title = COALESCE(?2, title),
                         body = COALESCE(?3, body),
                         author = COALESCE(?4, author),
                         updated_at = {NOW}
                     WHERE id = ?1
                     RETURNING {MESSAGE_COLUMNS}"
                ),
                params![id, changes.title, changes.body, changes.author],
                map_message,
            )?;

            tx.commit()?;
            Ok(Some(row))
        })
    }

    /// Returns whether a row was removed.
    pub fn delete_message(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(removed > 0)
        })
    }

    /// First message (in insertion order) with this exact title.
    pub fn find_message_by_title(&self, title: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE title = ?1 ORDER BY rowid LIMIT 1"),
                    [title],
                    map_message,
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_messages_by_titles(&self, titles: &[&str]) -> Result<usize> {
        self.with_conn(|conn| delete_where_in(conn, "messages", "title", titles))
    }
}

fn exists(conn: &Connection, table: &str, id: &str) -> Result<bool> {
    let found = conn
        .query_row(&format!("SELECT 1 FROM {table} WHERE id = ?1"), [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn delete_where_in(conn: &Connection, table: &str, column: &str, values: &[&str]) -> Result<usize> {
    if values.is_empty() {
        return Ok(0);
    }

    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "DELETE FROM {table} WHERE {column} IN ({})",
        placeholders.join(", ")
    );
    let removed = conn.execute(&sql, params_from_iter(values.iter()))?;
    Ok(removed)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            [id],
            map_user,
        )
        .optional()?;
    Ok(row)
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            [username],
            map_user,
        )
        .optional()?;
    Ok(row)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn map_message(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        author: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
