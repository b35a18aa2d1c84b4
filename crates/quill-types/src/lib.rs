//! Wire types shared by the Quill store, API and server crates.

pub mod api;
pub mod models;
pub mod object_id;

pub use object_id::{InvalidObjectId, ObjectId};
