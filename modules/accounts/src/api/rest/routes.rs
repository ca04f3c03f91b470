use axum::{
    routing::{delete, get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Assemble the accounts REST surface over a shared service.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/users", post(handlers::create_user))
        .route(
            "/users/{id}",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        .route("/users/{id}/items", get(handlers::list_user_items))
        .route("/items", post(handlers::create_item))
        .route("/items/{id}", delete(handlers::delete_item))
        .layer(Extension(service))
}
