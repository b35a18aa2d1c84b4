use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// A unique key (document id or username) is already taken.
    #[error("{0}")]
    Duplicate(String),

    /// A message references a user id with no matching row.
    #[error("author {0} does not exist")]
    UnknownAuthor(String),

    #[error("database lock poisoned: {0}")]
    LockPoisoned(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
