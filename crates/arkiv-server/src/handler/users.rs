//! Placeholder user handlers.
//!
//! The archive has no user store yet; these endpoints keep the frontend
//! contract alive with canned responses until real accounts land.

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};

use crate::handler::response::{MessageResponse, User};
use crate::service::ServiceState;

/// Returns the user routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user).put(update_user))
}

async fn create_user() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    )
}

async fn get_user(Path(id): Path<String>) -> Json<User> {
    let now = jiff::Timestamp::now();

    Json(User {
        id,
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        email: "john.doe@example.com".to_string(),
        created_at: now,
        updated_at: now,
    })
}

async fn update_user(Path(_id): Path<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "User updated successfully".to_string(),
    })
}
