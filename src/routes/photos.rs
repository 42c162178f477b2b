use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{delete, get, post},
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    response::ActionResponse,
    routes::params::PhotoQuery,
    state::AppState,
    store::Filter,
};

pub const PHOTOS_TABLE: &str = "photos";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload/", post(upload_photo))
        .route("/", get(list_photos))
        .route("/{id}", delete(delete_photo))
}

/// Unique storage name: random hex prefix, original name kept as suffix.
fn storage_filename(original: &str) -> String {
    format!("{}_{original}", Uuid::new_v4().simple())
}

#[utoipa::path(
    post,
    path = "/photos/upload/",
    responses(
        (status = 200, description = "Photo stored and recorded", body = serde_json::Value),
        (status = 400, description = "Missing listing_id or file"),
        (status = 502, description = "Storage upload failed")
    ),
    tag = "Photos"
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let mut listing_id: Option<i64> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("listing_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid listing_id: {e}")))?;
                listing_id = Some(
                    text.trim()
                        .parse::<i64>()
                        .map_err(|_| AppError::BadRequest("listing_id must be an integer.".into()))?,
                );
            }
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some((name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let listing_id =
        listing_id.ok_or_else(|| AppError::BadRequest("listing_id is required.".into()))?;
    let (original_name, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("file is required.".into()))?;

    let filename = storage_filename(&original_name);
    let bucket = &state.config.supabase_bucket;

    // Storage first; if it fails no record is created and nothing is rolled
    // back.
    state
        .store
        .upload_object(bucket, &filename, bytes, &content_type)
        .await?;
    let public_url = state.store.public_object_url(bucket, &filename);

    let photo = state
        .store
        .create(
            PHOTOS_TABLE,
            &serde_json::json!({ "listing_id": listing_id, "url": public_url }),
        )
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "url": public_url,
        "photo": photo,
    })))
}

#[utoipa::path(
    get,
    path = "/photos",
    params(("listing_id" = Option<i64>, Query, description = "Filter by listing")),
    responses(
        (status = 200, description = "Photo records", body = Vec<serde_json::Value>)
    ),
    tag = "Photos"
)]
pub async fn list_photos(
    State(state): State<AppState>,
    Query(query): Query<PhotoQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let mut filter = Filter::new();
    if let Some(listing_id) = query.listing_id {
        filter = filter.eq("listing_id", listing_id);
    }
    let photos = state.store.read(PHOTOS_TABLE, &filter, "*").await?;
    Ok(Json(photos))
}

#[utoipa::path(
    delete,
    path = "/photos/{id}",
    params(("id" = i64, Path, description = "Photo record ID")),
    responses(
        (status = 200, description = "Photo record deleted", body = ActionResponse)
    ),
    tag = "Photos"
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ActionResponse>> {
    // Removes the record only; the stored object stays in the bucket.
    state
        .store
        .delete(PHOTOS_TABLE, &Filter::new().eq("id", id))
        .await?;
    Ok(Json(ActionResponse::ok("Photo deleted from photos table.")))
}
