use serde::{Deserialize, Serialize};

use crate::ObjectId;
use crate::models::{Message, User};

/// Body of every successful `DELETE`.
pub const DELETED: &str = "Successfully deleted.";

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMessageRequest {
    /// Caller-supplied id; generated when absent.
    #[serde(rename = "_id", default)]
    pub id: Option<ObjectId>,
    pub title: String,
    pub body: String,
    pub author: ObjectId,
}

/// Partial update. `_id` is deliberately absent so it is rejected as unknown.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMessageRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<ObjectId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub author: Option<ObjectId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateMessageResponse {
    pub message: Message,
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[serde(rename = "_id", default)]
    pub id: Option<ObjectId>,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUserResponse {
    pub user: User,
}

// -- Shared --

/// `_id` echoes the path segment exactly as the caller sent it.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl DeleteResponse {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            message: DELETED.to_string(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
