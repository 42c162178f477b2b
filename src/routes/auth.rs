use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::Value;

use crate::{
    dto::auth::{LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    routes::users::{ALLOWED_ROLES, USERS_TABLE},
    services::reminder::{ReminderReport, dispatch_reminders, find_landlords_needing_reminder},
    state::AppState,
    store::{Filter, StoreError},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route(
            "/send_landlord_payment_reminders",
            post(send_landlord_payment_reminders),
        )
}

/// Credential errors from the auth sub-endpoint are the caller's fault, not
/// an upstream outage.
fn map_auth_err(err: StoreError) -> AppError {
    match err {
        StoreError::Unexpected { status, body } if (400..500).contains(&status) => {
            AppError::Auth(body)
        }
        other => AppError::Store(other),
    }
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = serde_json::Value),
        (status = 400, description = "Missing fields or bad role"),
        (status = 401, description = "Rejected by the auth service")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<Value>> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required.".into(),
        ));
    }
    let role = payload.role.unwrap_or_else(|| "user".to_string());
    if !ALLOWED_ROLES.contains(&role.as_str()) {
        return Err(AppError::BadRequest(
            "Role must be 'landlord' or 'user'.".into(),
        ));
    }

    let user_info = state
        .store
        .signup(&payload.email, &payload.password)
        .await
        .map_err(map_auth_err)?;

    // Mirror into the users table; the auth identity id becomes the row id.
    let user_id = user_info
        .pointer("/user/id")
        .or_else(|| user_info.get("id"))
        .and_then(Value::as_str);
    if let Some(user_id) = user_id {
        state
            .store
            .create(
                USERS_TABLE,
                &serde_json::json!({
                    "id": user_id,
                    "email": payload.email,
                    "role": role,
                }),
            )
            .await?;
    }

    Ok(Json(serde_json::json!({
        "msg": "Registration successful.",
        "user": user_info,
    })))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = serde_json::Value),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required.".into(),
        ));
    }

    let auth = state
        .store
        .password_login(&payload.email, &payload.password)
        .await
        .map_err(map_auth_err)?;
    Ok(Json(serde_json::json!({
        "msg": "Login successful.",
        "auth": auth,
    })))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Token claims plus users-table profile", body = serde_json::Value),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Value>> {
    let profile = state
        .store
        .read(
            USERS_TABLE,
            &Filter::new().eq("id", &user.user_id),
            "email,role",
        )
        .await?;
    Ok(Json(serde_json::json!({
        "user": user.claims,
        "profile": profile.first(),
    })))
}

#[utoipa::path(
    post,
    path = "/auth/send_landlord_payment_reminders",
    responses(
        (status = 200, description = "Reminder sweep outcome", body = ReminderReport)
    ),
    tag = "Auth"
)]
pub async fn send_landlord_payment_reminders(
    State(state): State<AppState>,
) -> AppResult<Json<ReminderReport>> {
    let emails = find_landlords_needing_reminder(&state.store, Utc::now()).await?;
    let report = dispatch_reminders(&state.mailer, emails).await;
    Ok(Json(report))
}
