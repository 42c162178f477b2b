use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    response::ActionResponse,
    routes::params::{FavouriteKeyQuery, FavouriteListQuery},
    state::AppState,
    store::{Filter, query::FAVOURITE_SELECT},
};

/// Favourites live in the store's `saved_listings` table.
pub const FAVOURITES_TABLE: &str = "saved_listings";

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddFavouriteRequest {
    pub user_id: Option<String>,
    pub listing_id: Option<i64>,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_favourites).post(add_favourite).delete(remove_favourite),
    )
}

#[utoipa::path(
    get,
    path = "/favourites",
    params(("user_id" = String, Query, description = "User to fetch favourites for")),
    responses(
        (status = 200, description = "Favourites with embedded listing", body = Vec<serde_json::Value>)
    ),
    tag = "Favourites"
)]
pub async fn list_favourites(
    State(state): State<AppState>,
    Query(query): Query<FavouriteListQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let favourites = state
        .store
        .read(
            FAVOURITES_TABLE,
            &Filter::new().eq("user_id", &query.user_id),
            FAVOURITE_SELECT,
        )
        .await?;
    Ok(Json(favourites))
}

#[utoipa::path(
    post,
    path = "/favourites",
    request_body = AddFavouriteRequest,
    responses(
        (status = 200, description = "Favourite added", body = ActionResponse),
        (status = 400, description = "Missing ids"),
        (status = 409, description = "Already favourited")
    ),
    tag = "Favourites"
)]
pub async fn add_favourite(
    State(state): State<AppState>,
    Json(payload): Json<AddFavouriteRequest>,
) -> AppResult<Json<ActionResponse>> {
    let user_id = payload
        .user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("user_id and listing_id required".into()))?;
    let listing_id = payload
        .listing_id
        .ok_or_else(|| AppError::BadRequest("user_id and listing_id required".into()))?;

    let dups = state
        .store
        .read(
            FAVOURITES_TABLE,
            &Filter::new()
                .eq("user_id", &user_id)
                .eq("listing_id", listing_id),
            "*",
        )
        .await?;
    if !dups.is_empty() {
        return Err(AppError::Conflict("Listing is already in favourites.".into()));
    }

    state
        .store
        .create(
            FAVOURITES_TABLE,
            &serde_json::json!({ "user_id": user_id, "listing_id": listing_id }),
        )
        .await?;
    Ok(Json(ActionResponse::ok("Favourite added.")))
}

#[utoipa::path(
    delete,
    path = "/favourites",
    params(
        ("user_id" = String, Query, description = "User ID"),
        ("listing_id" = i64, Query, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Favourite removed", body = ActionResponse),
        (status = 404, description = "Favourite not found")
    ),
    tag = "Favourites"
)]
pub async fn remove_favourite(
    State(state): State<AppState>,
    Query(query): Query<FavouriteKeyQuery>,
) -> AppResult<Json<ActionResponse>> {
    let filter = Filter::new()
        .eq("user_id", &query.user_id)
        .eq("listing_id", query.listing_id);

    // Unlike the other deletes this one confirms existence first so the
    // caller can distinguish a no-op.
    let existing = state.store.read(FAVOURITES_TABLE, &filter, "*").await?;
    if existing.is_empty() {
        return Err(AppError::NotFound);
    }

    state.store.delete(FAVOURITES_TABLE, &filter).await?;
    Ok(Json(ActionResponse::ok("Favourite removed.")))
}
