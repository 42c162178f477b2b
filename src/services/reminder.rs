//! Payment-reminder sweep: during the last week of the month, landlords
//! without a confirmed payment this month get a renewal email.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::{sync::Semaphore, task::JoinSet};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    mailer::Mailer,
    services::license::{PAYMENTS_TABLE, month_start, next_month_start},
    store::{Filter, StoreClient},
};

pub const USERS_TABLE: &str = "users";

/// Day of month after which landlords get reminded; day 23 itself is
/// excluded.
pub const REMINDER_WINDOW_DAY: u32 = 23;

/// At most this many reminder emails in flight at once.
const MAX_SENDS_IN_FLIGHT: usize = 4;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReminderReport {
    pub success: bool,
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
    pub emails: Vec<String>,
}

/// Emails of landlords with no confirmed payment inside the current month
/// window, flagged only during the last week of the month.
pub async fn find_landlords_needing_reminder(
    store: &StoreClient,
    now: DateTime<Utc>,
) -> AppResult<Vec<String>> {
    let start = month_start(now)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid month boundary")))?;
    let end = next_month_start(now)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid month boundary")))?;

    let landlords = store
        .read(USERS_TABLE, &Filter::new().eq("role", "landlord"), "id,email")
        .await?;

    let mut flagged = Vec::new();
    for landlord in &landlords {
        let Some(user_id) = landlord.get("id").and_then(Value::as_str) else {
            continue;
        };
        let filter = Filter::new()
            .eq("user_id", user_id)
            .eq("confirmed", "true")
            .gte("created_at", start.to_rfc3339())
            .lt("created_at", end.to_rfc3339());
        let payments = store.read(PAYMENTS_TABLE, &filter, "*").await?;

        if payments.is_empty() && now.day() > REMINDER_WINDOW_DAY {
            if let Some(email) = landlord.get("email").and_then(Value::as_str) {
                flagged.push(email.to_string());
            }
        }
    }
    Ok(flagged)
}

/// Send one reminder per email with bounded concurrency, awaiting every
/// outcome so the caller can report real sent/failed counts.
pub async fn dispatch_reminders(mailer: &Mailer, emails: Vec<String>) -> ReminderReport {
    let semaphore = Arc::new(Semaphore::new(MAX_SENDS_IN_FLIGHT));
    let mut tasks = JoinSet::new();

    for email in emails.iter().cloned() {
        let mailer = mailer.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            match mailer.send_license_reminder(&email).await {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(error = %err, email = %email, "reminder email failed");
                    false
                }
            }
        });
    }

    let mut sent = 0;
    let mut failed = 0;
    while let Some(outcome) = tasks.join_next().await {
        match outcome {
            Ok(true) => sent += 1,
            _ => failed += 1,
        }
    }

    ReminderReport {
        success: true,
        attempted: emails.len(),
        sent,
        failed,
        emails,
    }
}
