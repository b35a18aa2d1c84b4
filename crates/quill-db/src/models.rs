//! Database row types. These map directly to SQLite rows; ids are stored as
//! 24-char hex and timestamps as RFC 3339 text.
//! Distinct from quill-types API models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string.
    pub password: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields to overwrite on a user; `None` keeps the stored value.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserChanges<'a> {
    pub username: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

/// Fields to overwrite on a message; `None` keeps the stored value.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageChanges<'a> {
    pub title: Option<&'a str>,
    pub body: Option<&'a str>,
    pub author: Option<&'a str>,
}
