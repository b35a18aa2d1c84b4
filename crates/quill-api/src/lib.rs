pub mod error;
pub mod health;
pub mod messages;
pub mod rows;
pub mod state;
pub mod users;

use axum::{Router, routing::get};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// All Quill routes, bound to `state`. Layers (CORS, tracing) are added by the
/// server so tests can drive the bare router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route(
            "/messages/{id}",
            get(messages::get_message)
                .put(messages::update_message)
                .delete(messages::delete_message),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/health", get(health::health))
        .with_state(state)
}
