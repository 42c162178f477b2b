mod common;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use common::{spawn_mock_store, test_state};
use kejahunt_api::{
    error::AppError,
    routes::payments::{CreatePaymentRequest, confirm_payment, create_payment},
    services::{
        license::{check_landlord_can_list, month_start},
        reminder::{dispatch_reminders, find_landlords_needing_reminder},
    },
};

fn landlord(id: &str, email: &str) -> serde_json::Value {
    json!({ "id": id, "email": email, "role": "landlord" })
}

#[tokio::test]
async fn payment_creation_validates_foreign_ids() {
    let (base_url, store) = spawn_mock_store().await;
    let state = test_state(&base_url);

    store.seed("users", vec![landlord("landlord-a", "a@example.com")]);
    store.seed("listings", vec![json!({ "id": 7, "title": "Bedsitter" })]);

    let unknown_user = create_payment(
        State(state.clone()),
        Json(CreatePaymentRequest {
            user_id: Some("nobody".into()),
            listing_id: Some(7),
            amount: Some(500.0),
            confirmed: None,
        }),
    )
    .await;
    assert!(matches!(unknown_user, Err(AppError::BadRequest(_))));

    let created = create_payment(
        State(state),
        Json(CreatePaymentRequest {
            user_id: Some("landlord-a".into()),
            listing_id: Some(7),
            amount: Some(500.0),
            confirmed: None,
        }),
    )
    .await
    .expect("payment created")
    .0;
    assert_eq!(created["success"], true);
    assert_eq!(created["payment"]["confirmed"], false);
    assert!(created["payment"]["created_at"].is_string());
}

#[tokio::test]
async fn payment_confirmation_is_idempotent() {
    let (base_url, store) = spawn_mock_store().await;
    let state = test_state(&base_url);

    store.seed(
        "payments",
        vec![json!({
            "id": 5,
            "user_id": "landlord-a",
            "listing_id": 7,
            "amount": 500.0,
            "confirmed": false,
            "created_at": Utc::now().to_rfc3339(),
        })],
    );

    confirm_payment(State(state.clone()), Path(5))
        .await
        .expect("first confirm");
    confirm_payment(State(state.clone()), Path(5))
        .await
        .expect("second confirm");

    let rows = store.rows("payments");
    assert_eq!(rows[0]["confirmed"], true);
}

#[tokio::test]
async fn license_gate_requires_confirmed_payment_this_month() {
    let (base_url, store) = spawn_mock_store().await;
    let state = test_state(&base_url);

    let start = month_start(Utc::now()).unwrap();

    store.seed(
        "payments",
        vec![
            // Paid on the 1st of this month: passes.
            json!({
                "id": 1, "user_id": "landlord-a", "listing_id": 7, "amount": 500.0,
                "confirmed": true, "created_at": start.to_rfc3339(),
            }),
            // Last instant of the previous month: fails.
            json!({
                "id": 2, "user_id": "landlord-b", "listing_id": 7, "amount": 500.0,
                "confirmed": true, "created_at": (start - Duration::seconds(1)).to_rfc3339(),
            }),
            // This month but unconfirmed: fails.
            json!({
                "id": 3, "user_id": "landlord-c", "listing_id": 7, "amount": 500.0,
                "confirmed": false, "created_at": (start + Duration::days(1)).to_rfc3339(),
            }),
        ],
    );

    check_landlord_can_list(&state.store, "landlord-a")
        .await
        .expect("current-month payment passes the gate");

    let stale = check_landlord_can_list(&state.store, "landlord-b").await;
    assert!(matches!(stale, Err(AppError::PaymentRequired(_))));

    let unconfirmed = check_landlord_can_list(&state.store, "landlord-c").await;
    assert!(matches!(unconfirmed, Err(AppError::PaymentRequired(_))));
}

#[tokio::test]
async fn reminder_list_respects_payment_state_and_day_window() {
    let (base_url, store) = spawn_mock_store().await;
    let state = test_state(&base_url);

    store.seed(
        "users",
        vec![
            landlord("landlord-unpaid", "unpaid@example.com"),
            landlord("landlord-paid", "paid@example.com"),
            json!({ "id": "seeker", "email": "seeker@example.com", "role": "user" }),
        ],
    );
    store.seed(
        "payments",
        vec![json!({
            "id": 1, "user_id": "landlord-paid", "listing_id": 7, "amount": 500.0,
            "confirmed": true,
            "created_at": Utc.with_ymd_and_hms(2026, 8, 2, 10, 0, 0).unwrap().to_rfc3339(),
        })],
    );

    let day_25 = Utc.with_ymd_and_hms(2026, 8, 25, 9, 0, 0).unwrap();
    let flagged = find_landlords_needing_reminder(&state.store, day_25)
        .await
        .expect("reminder sweep");
    assert_eq!(flagged, vec!["unpaid@example.com".to_string()]);

    // Outside the last-week window nobody is flagged, paid or not.
    let day_20 = Utc.with_ymd_and_hms(2026, 8, 20, 9, 0, 0).unwrap();
    let flagged = find_landlords_needing_reminder(&state.store, day_20)
        .await
        .expect("reminder sweep");
    assert!(flagged.is_empty());
}

#[tokio::test]
async fn reminder_dispatch_reports_real_outcomes() {
    let (base_url, _store) = spawn_mock_store().await;
    let state = test_state(&base_url);

    // The test mailer points at a closed port, so every send fails and the
    // report must say so instead of echoing the list as sent.
    let report = dispatch_reminders(
        &state.mailer,
        vec!["a@example.com".into(), "b@example.com".into()],
    )
    .await;
    assert_eq!(report.attempted, 2);
    assert_eq!(report.sent, 0);
    assert_eq!(report.failed, 2);
}
