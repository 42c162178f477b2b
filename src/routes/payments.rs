use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    response::ActionResponse,
    routes::{listings::LISTINGS_TABLE, params::PaymentQuery, users::USERS_TABLE},
    services::license::PAYMENTS_TABLE,
    state::AppState,
    store::Filter,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub user_id: Option<String>,
    pub listing_id: Option<i64>,
    pub amount: Option<f64>,
    pub confirmed: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route("/{id}", get(get_payment))
        .route("/{id}/confirm", patch(confirm_payment))
        .route("/mpesa/webhook", post(mpesa_webhook))
}

/// Both foreign ids must resolve before a payment row is created.
async fn validate_user_and_listing(
    state: &AppState,
    user_id: &str,
    listing_id: i64,
) -> AppResult<()> {
    let users = state
        .store
        .read(USERS_TABLE, &Filter::new().eq("id", user_id), "id")
        .await?;
    if users.is_empty() {
        return Err(AppError::BadRequest("Invalid user_id".into()));
    }
    let listings = state
        .store
        .read(LISTINGS_TABLE, &Filter::new().eq("id", listing_id), "id")
        .await?;
    if listings.is_empty() {
        return Err(AppError::BadRequest("Invalid listing_id".into()));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/payments",
    params(
        ("user_id" = Option<String>, Query, description = "Filter by user"),
        ("listing_id" = Option<i64>, Query, description = "Filter by listing")
    ),
    responses(
        (status = 200, description = "Payments", body = Vec<serde_json::Value>)
    ),
    tag = "Payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let mut filter = Filter::new();
    if let Some(user_id) = &query.user_id {
        filter = filter.eq("user_id", user_id);
    }
    if let Some(listing_id) = query.listing_id {
        filter = filter.eq("listing_id", listing_id);
    }
    let payments = state.store.read(PAYMENTS_TABLE, &filter, "*").await?;
    Ok(Json(payments))
}

#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Payment recorded", body = serde_json::Value),
        (status = 400, description = "Missing fields or unknown user/listing")
    ),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<Value>> {
    let user_id = payload
        .user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("user_id, listing_id, and amount are required.".into())
        })?;
    let listing_id = payload.listing_id.ok_or_else(|| {
        AppError::BadRequest("user_id, listing_id, and amount are required.".into())
    })?;
    let amount = payload.amount.ok_or_else(|| {
        AppError::BadRequest("user_id, listing_id, and amount are required.".into())
    })?;

    validate_user_and_listing(&state, &user_id, listing_id).await?;

    let payment = state
        .store
        .create(
            PAYMENTS_TABLE,
            &serde_json::json!({
                "user_id": user_id,
                "listing_id": listing_id,
                "amount": amount,
                "confirmed": payload.confirmed.unwrap_or(false),
                "created_at": Utc::now().to_rfc3339(),
            }),
        )
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "msg": "Payment recorded.",
        "payment": payment,
    })))
}

#[utoipa::path(
    patch,
    path = "/payments/{id}/confirm",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment confirmed", body = ActionResponse)
    ),
    tag = "Payments"
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ActionResponse>> {
    // Unconditional flip; confirming an already-confirmed payment is a no-op.
    state
        .store
        .update(
            PAYMENTS_TABLE,
            &Filter::new().eq("id", id),
            &serde_json::json!({ "confirmed": true }),
        )
        .await?;
    Ok(Json(ActionResponse::ok("Payment confirmed.")))
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment detail", body = serde_json::Value),
        (status = 404, description = "Payment not found")
    ),
    tag = "Payments"
)]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let mut rows = state
        .store
        .read(PAYMENTS_TABLE, &Filter::new().eq("id", id), "*")
        .await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }
    Ok(Json(rows.remove(0)))
}

#[utoipa::path(
    post,
    path = "/payments/mpesa/webhook",
    responses(
        (status = 200, description = "Payload acknowledged", body = ActionResponse)
    ),
    tag = "Payments"
)]
pub async fn mpesa_webhook(Json(body): Json<Value>) -> Json<ActionResponse> {
    // Reconciliation to payment rows is not implemented; the payload is only
    // logged and the acknowledgement says so.
    tracing::info!(payload = %body, "received M-PESA webhook");
    Json(ActionResponse::ok(
        "Webhook received; payment reconciliation is not implemented.",
    ))
}
