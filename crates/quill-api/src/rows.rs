//! Row → API model conversion. The store only ever writes well-formed values,
//! so a corrupt column is logged and replaced with a default rather than
//! failing the whole request.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use quill_db::models::{MessageRow, UserRow};
use quill_types::ObjectId;
use quill_types::models::{Message, User};

pub fn message_from_row(row: MessageRow) -> Message {
    Message {
        id: parse_id(&row.id, "id", &row.id),
        author: parse_id(&row.author, "author", &row.id),
        created_at: parse_timestamp(&row.created_at, &row.id),
        updated_at: parse_timestamp(&row.updated_at, &row.id),
        title: row.title,
        body: row.body,
    }
}

pub fn user_from_row(row: UserRow) -> User {
    User {
        id: parse_id(&row.id, "id", &row.id),
        created_at: parse_timestamp(&row.created_at, &row.id),
        updated_at: parse_timestamp(&row.updated_at, &row.id),
        username: row.username,
    }
}

fn parse_id(value: &str, column: &str, row_id: &str) -> ObjectId {
    ObjectId::parse(value).unwrap_or_else(|e| {
        warn!("Corrupt {} '{}' on row '{}': {}", column, value, row_id, e);
        ObjectId::from_bytes([0; 12])
    })
}

fn parse_timestamp(value: &str, row_id: &str) -> DateTime<Utc> {
    value
        .parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by hand may use SQLite's datetime() format.
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' on row '{}': {}", value, row_id, e);
            DateTime::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_store_row() {
        let row = MessageRow {
            id: "626262626262626262626262".into(),
            title: "Test".into(),
            body: "Testing Body".into(),
            author: "616161616161616161616161".into(),
            created_at: "2026-10-18T09:30:00.125Z".into(),
            updated_at: "2026-10-18 09:31:00".into(),
        };
        let message = message_from_row(row);
        assert_eq!(message.id, ObjectId::parse("bbbbbbbbbbbb").unwrap());
        assert_eq!(message.author.to_string(), "616161616161616161616161");
        assert_eq!(message.created_at.timestamp_subsec_millis(), 125);
        assert_eq!(message.updated_at.to_rfc3339(), "2026-10-18T09:31:00+00:00");
    }

    #[test]
    fn corrupt_columns_fall_back() {
        let row = UserRow {
            id: "not-an-id".into(),
            username: "myuser".into(),
            password: "hash".into(),
            created_at: "yesterday".into(),
            updated_at: "yesterday".into(),
        };
        let user = user_from_row(row);
        assert_eq!(user.id.bytes(), [0; 12]);
        assert_eq!(user.created_at, DateTime::<Utc>::default());
        assert_eq!(user.username, "myuser");
    }
}
