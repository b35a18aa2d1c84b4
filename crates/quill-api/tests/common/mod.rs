//! Shared fixtures: an in-memory store behind the bare router, seeded with
//! one user and one message.

#![allow(dead_code)]

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum_test::TestServer;

use quill_api::{AppState, AppStateInner, users::hash_password};
use quill_db::Database;
use quill_types::ObjectId;

/// Raw 12-byte ids, as a client would type them.
pub const SAMPLE_USER_ID: &str = "aaaaaaaaaaaa";
pub const SAMPLE_MESSAGE_ID: &str = "bbbbbbbbbbbb";
pub const SAMPLE_MESSAGE_ID2: &str = "cccccccccccc";

pub fn hex(raw: &str) -> String {
    ObjectId::parse(raw).expect("valid sample id").to_hex()
}

pub fn empty_server() -> (TestServer, AppState) {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    let state = AppStateInner::new(db);
    let server = TestServer::new(quill_api::router(state.clone())).expect("Failed to create test server");
    (server, state)
}

/// A server whose store holds `myuser` and the "Test" message it authored.
pub fn seeded_server() -> (TestServer, AppState) {
    let (server, state) = empty_server();

    let password_hash = hash_password("mypassword").expect("hash");
    state
        .db
        .create_user(&hex(SAMPLE_USER_ID), "myuser", &password_hash)
        .expect("Failed to seed user");
    state
        .db
        .insert_message(&hex(SAMPLE_MESSAGE_ID), "Test", "Testing Body", &hex(SAMPLE_USER_ID))
        .expect("Failed to seed message");

    (server, state)
}

/// Check `password` against a stored PHC string. Unparseable hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
