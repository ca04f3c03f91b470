use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::rest::dto::{CreateItemReq, CreateUserReq, ItemDto, ItemListDto, LoginReq, UserDto};
use crate::api::rest::error::{map_domain_error, ApiError};
use crate::domain::service::Service;

/// Authenticate a user by email and password.
pub async fn login(
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<LoginReq>,
) -> Result<Json<UserDto>, ApiError> {
    info!("Login request: {:?}", req_body);

    match svc.login(req_body.into()).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => Err(map_domain_error(&e)),
    }
}

/// Register a new user.
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<CreateUserReq>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    info!("Creating user: {:?}", req_body);

    match svc.register_user(req_body.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// Get a specific user by ID.
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ApiError> {
    info!("Getting user with id: {}", id);

    match svc.get_user(id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Delete a user by ID. Refused while the user still owns items.
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    info!("Deleting user: {}", id);

    match svc.delete_user(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// List all items owned by one user.
pub async fn list_user_items(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<Json<ItemListDto>, ApiError> {
    info!("Listing items for user: {}", id);

    match svc.items_owned_by(id).await {
        Ok(items) => {
            let dto_items: Vec<ItemDto> = items.into_iter().map(ItemDto::from).collect();
            let response = ItemListDto {
                total: dto_items.len(),
                items: dto_items,
            };
            Ok(Json(response))
        }
        Err(e) => {
            error!("Failed to list items for user {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}

/// Create a new item.
pub async fn create_item(
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<CreateItemReq>,
) -> Result<(StatusCode, Json<ItemDto>), ApiError> {
    info!("Creating item: {:?}", req_body);

    match svc.create_item(req_body.into()).await {
        Ok(item) => Ok((StatusCode::CREATED, Json(ItemDto::from(item)))),
        Err(e) => {
            error!("Failed to create item: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// Delete an item by ID.
pub async fn delete_item(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    info!("Deleting item: {}", id);

    match svc.delete_item(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete item {}: {}", id, e);
            Err(map_domain_error(&e))
        }
    }
}
