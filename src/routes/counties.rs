use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    response::ActionResponse,
    state::AppState,
    store::Filter,
};

pub const COUNTIES_TABLE: &str = "counties";

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCountyRequest {
    pub name: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_counties).post(add_county))
        .route("/{id}", get(get_county))
}

#[utoipa::path(
    get,
    path = "/counties",
    responses(
        (status = 200, description = "All counties", body = Vec<serde_json::Value>)
    ),
    tag = "Counties"
)]
pub async fn list_counties(State(state): State<AppState>) -> AppResult<Json<Vec<Value>>> {
    let counties = state.store.read(COUNTIES_TABLE, &Filter::new(), "*").await?;
    Ok(Json(counties))
}

#[utoipa::path(
    get,
    path = "/counties/{id}",
    params(("id" = i64, Path, description = "County ID")),
    responses(
        (status = 200, description = "County detail", body = serde_json::Value),
        (status = 404, description = "County not found")
    ),
    tag = "Counties"
)]
pub async fn get_county(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let mut rows = state
        .store
        .read(COUNTIES_TABLE, &Filter::new().eq("id", id), "*")
        .await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(Json(rows.remove(0)))
}

#[utoipa::path(
    post,
    path = "/counties",
    request_body = CreateCountyRequest,
    responses(
        (status = 200, description = "County added", body = ActionResponse),
        (status = 400, description = "Missing name"),
        (status = 409, description = "Duplicate name")
    ),
    tag = "Counties"
)]
pub async fn add_county(
    State(state): State<AppState>,
    Json(payload): Json<CreateCountyRequest>,
) -> AppResult<Json<ActionResponse>> {
    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("County name required.".into()))?;

    let dups = state
        .store
        .read(COUNTIES_TABLE, &Filter::new().eq("name", &name), "*")
        .await?;
    if !dups.is_empty() {
        return Err(AppError::Conflict("County name already exists.".into()));
    }

    state
        .store
        .create(COUNTIES_TABLE, &serde_json::json!({ "name": name }))
        .await?;
    Ok(Json(ActionResponse::ok("County added successfully.")))
}
