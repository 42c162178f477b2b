//! Monthly landlord license gate: a landlord may create listings only with
//! a confirmed payment inside the current calendar month (UTC).

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::{
    error::{AppError, AppResult},
    store::{Filter, StoreClient},
};

pub const PAYMENTS_TABLE: &str = "payments";

/// First instant of the month containing `now`.
pub fn month_start(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
}

/// First instant of the month after the one containing `now`.
pub fn next_month_start(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

/// Fails with 402 unless `user_id` has at least one confirmed payment since
/// the start of the current month.
pub async fn check_landlord_can_list(store: &StoreClient, user_id: &str) -> AppResult<()> {
    let start = month_start(Utc::now())
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid month boundary")))?;

    let filter = Filter::new()
        .eq("user_id", user_id)
        .eq("confirmed", "true")
        .gte("created_at", start.to_rfc3339());
    let payments = store.read(PAYMENTS_TABLE, &filter, "*").await?;

    if payments.is_empty() {
        return Err(AppError::PaymentRequired(
            "Renew your monthly landlord license/payment to list houses.".into(),
        ));
    }
    Ok(())
}
