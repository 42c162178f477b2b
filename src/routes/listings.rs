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
    middleware::auth::AuthUser,
    routes::{params::ListingQuery, regions::REGIONS_TABLE, users::USERS_TABLE},
    services::license::check_landlord_can_list,
    state::AppState,
    store::{Filter, query::LISTING_SELECT},
};

pub const LISTINGS_TABLE: &str = "listings";

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub price: Option<f64>,
    pub region_id: Option<i64>,
    pub description: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_listings).post(create_listing))
        .route("/{id}", get(get_listing))
}

#[utoipa::path(
    get,
    path = "/listings",
    params(
        ("skip" = Option<i64>, Query, description = "Pagination offset, default 0"),
        ("limit" = Option<i64>, Query, description = "Page size, default 20"),
        ("county_id" = Option<i64>, Query, description = "Filter by county"),
        ("region_id" = Option<i64>, Query, description = "Filter by region"),
        ("price_min" = Option<f64>, Query, description = "Minimum price"),
        ("price_max" = Option<f64>, Query, description = "Maximum price"),
        ("type" = Option<String>, Query, description = "House type, e.g. bedsitter")
    ),
    responses(
        (status = 200, description = "Listings with embedded photos/region/county", body = Vec<serde_json::Value>)
    ),
    tag = "Listings"
)]
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let mut filter = Filter::new();
    if let Some(county_id) = query.county_id {
        filter = filter.regions_in_county(county_id);
    }
    if let Some(region_id) = query.region_id {
        filter = filter.eq("region_id", region_id);
    }
    if let Some(price_min) = query.price_min {
        filter = filter.gte("price", price_min);
    }
    if let Some(price_max) = query.price_max {
        filter = filter.lte("price", price_max);
    }
    if let Some(kind) = &query.kind {
        filter = filter.eq("type", kind);
    }
    let (limit, skip) = query.pagination();
    filter = filter.paginate(limit, skip);

    let listings = state
        .store
        .read(LISTINGS_TABLE, &filter, LISTING_SELECT)
        .await?;
    Ok(Json(listings))
}

#[utoipa::path(
    get,
    path = "/listings/{id}",
    params(("id" = i64, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing detail", body = serde_json::Value),
        (status = 404, description = "Listing not found")
    ),
    tag = "Listings"
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let mut rows = state
        .store
        .read(LISTINGS_TABLE, &Filter::new().eq("id", id), LISTING_SELECT)
        .await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(Json(rows.remove(0)))
}

#[utoipa::path(
    post,
    path = "/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Listing created", body = serde_json::Value),
        (status = 400, description = "Missing fields or unknown region"),
        (status = 402, description = "Monthly license payment required")
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
pub async fn create_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateListingRequest>,
) -> AppResult<Json<Value>> {
    let title = payload
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("title, type, price and region_id are required.".into()))?;
    let kind = payload
        .kind
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("title, type, price and region_id are required.".into()))?;
    let price = payload
        .price
        .ok_or_else(|| AppError::BadRequest("title, type, price and region_id are required.".into()))?;
    let region_id = payload
        .region_id
        .ok_or_else(|| AppError::BadRequest("title, type, price and region_id are required.".into()))?;

    let regions = state
        .store
        .read(REGIONS_TABLE, &Filter::new().eq("id", region_id), "id")
        .await?;
    if regions.is_empty() {
        return Err(AppError::BadRequest("Invalid region_id".into()));
    }

    let profile = state
        .store
        .read(USERS_TABLE, &Filter::new().eq("id", &user.user_id), "role")
        .await?;
    let is_landlord = profile
        .first()
        .and_then(|p| p.get("role"))
        .and_then(Value::as_str)
        .is_some_and(|role| role == "landlord");
    if !is_landlord {
        return Err(AppError::BadRequest(
            "Only landlords can create listings.".into(),
        ));
    }

    check_landlord_can_list(&state.store, &user.user_id).await?;

    let listing = state
        .store
        .create(
            LISTINGS_TABLE,
            &serde_json::json!({
                "title": title,
                "type": kind,
                "price": price,
                "region_id": region_id,
                "description": payload.description,
            }),
        )
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "msg": "Listing created.",
        "listing": listing,
    })))
}
