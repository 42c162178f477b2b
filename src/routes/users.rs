use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    response::ActionResponse,
    routes::params::UserQuery,
    state::AppState,
    store::Filter,
};

pub const USERS_TABLE: &str = "users";

pub const ALLOWED_ROLES: [&str; 2] = ["landlord", "user"];

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub role: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).patch(update_user).delete(delete_user))
        .route("/by_email/{email}", get(get_user_by_email))
}

#[utoipa::path(
    get,
    path = "/users",
    params(("role" = Option<String>, Query, description = "Filter by role (landlord/user)")),
    responses(
        (status = 200, description = "Users", body = Vec<serde_json::Value>)
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let mut filter = Filter::new();
    if let Some(role) = &query.role {
        filter = filter.eq("role", role);
    }
    let users = state.store.read(USERS_TABLE, &filter, "*").await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User detail", body = serde_json::Value),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let mut rows = state
        .store
        .read(USERS_TABLE, &Filter::new().eq("id", &id), "*")
        .await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(Json(rows.remove(0)))
}

#[utoipa::path(
    get,
    path = "/users/by_email/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User detail", body = serde_json::Value),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Value>> {
    let mut rows = state
        .store
        .read(USERS_TABLE, &Filter::new().eq("email", &email), "*")
        .await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(Json(rows.remove(0)))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ActionResponse),
        (status = 400, description = "No fields or bad role")
    ),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<ActionResponse>> {
    if payload.email.is_none() && payload.role.is_none() {
        return Err(AppError::BadRequest("No fields to update.".into()));
    }
    if let Some(role) = &payload.role {
        if !ALLOWED_ROLES.contains(&role.as_str()) {
            return Err(AppError::BadRequest(
                "Role must be 'landlord' or 'user'.".into(),
            ));
        }
    }

    let mut patch = serde_json::Map::new();
    if let Some(email) = payload.email {
        patch.insert("email".into(), Value::String(email));
    }
    if let Some(role) = payload.role {
        patch.insert("role".into(), Value::String(role));
    }

    state
        .store
        .update(USERS_TABLE, &Filter::new().eq("id", &id), &Value::Object(patch))
        .await?;
    Ok(Json(ActionResponse::ok("User updated.")))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User row deleted", body = ActionResponse)
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ActionResponse>> {
    // Removes the table row only; the auth identity stays with the store.
    state
        .store
        .delete(USERS_TABLE, &Filter::new().eq("id", &id))
        .await?;
    Ok(Json(ActionResponse::ok("User deleted from table.")))
}
