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
    routes::params::RegionQuery,
    state::AppState,
    store::Filter,
};

pub const REGIONS_TABLE: &str = "regions";

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRegionRequest {
    pub name: Option<String>,
    pub county_id: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_regions).post(add_region))
        .route("/{id}", get(get_region))
}

#[utoipa::path(
    get,
    path = "/regions",
    params(("county_id" = Option<i64>, Query, description = "Filter regions by county")),
    responses(
        (status = 200, description = "Regions", body = Vec<serde_json::Value>)
    ),
    tag = "Regions"
)]
pub async fn list_regions(
    State(state): State<AppState>,
    Query(query): Query<RegionQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let mut filter = Filter::new();
    if let Some(county_id) = query.county_id {
        filter = filter.eq("county_id", county_id);
    }
    let regions = state.store.read(REGIONS_TABLE, &filter, "*").await?;
    Ok(Json(regions))
}

#[utoipa::path(
    get,
    path = "/regions/{id}",
    params(("id" = i64, Path, description = "Region ID")),
    responses(
        (status = 200, description = "Region detail", body = serde_json::Value),
        (status = 404, description = "Region not found")
    ),
    tag = "Regions"
)]
pub async fn get_region(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let mut rows = state
        .store
        .read(REGIONS_TABLE, &Filter::new().eq("id", id), "*")
        .await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(Json(rows.remove(0)))
}

#[utoipa::path(
    post,
    path = "/regions",
    request_body = CreateRegionRequest,
    responses(
        (status = 200, description = "Region added", body = ActionResponse),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Duplicate name within county")
    ),
    tag = "Regions"
)]
pub async fn add_region(
    State(state): State<AppState>,
    Json(payload): Json<CreateRegionRequest>,
) -> AppResult<Json<ActionResponse>> {
    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Both name and county_id are required.".into()))?;
    let county_id = payload
        .county_id
        .ok_or_else(|| AppError::BadRequest("Both name and county_id are required.".into()))?;

    // Uniqueness is scoped per county: the same name may exist under a
    // different county_id.
    let dups = state
        .store
        .read(
            REGIONS_TABLE,
            &Filter::new().eq("name", &name).eq("county_id", county_id),
            "*",
        )
        .await?;
    if !dups.is_empty() {
        return Err(AppError::Conflict(
            "Region with this name already exists in the county.".into(),
        ));
    }

    state
        .store
        .create(
            REGIONS_TABLE,
            &serde_json::json!({ "name": name, "county_id": county_id }),
        )
        .await?;
    Ok(Json(ActionResponse::ok("Region added successfully.")))
}
