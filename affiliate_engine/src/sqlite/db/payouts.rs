use affiliate_common::Paise;
use chrono::{DateTime, Utc};
use log::debug;
use sqlx::{types::Json, SqliteConnection};

use crate::db_types::{NewPayout, Payout, PayoutStatus};

pub async fn insert_payout(
    payout: &NewPayout,
    amount: Paise,
    created_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Payout, sqlx::Error> {
    let payout: Payout = sqlx::query_as(
        r#"
            INSERT INTO payouts (user_id, amount, commission_ids, payment_method, transaction_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6)
            RETURNING *;
        "#,
    )
    .bind(payout.user_id)
    .bind(amount)
    .bind(Json(payout.commission_ids.clone()))
    .bind(payout.payment_method.as_str())
    .bind(payout.transaction_id.as_deref())
    .bind(created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Payout #{} of {} created for user #{}", payout.id, payout.amount, payout.user_id);
    Ok(payout)
}

pub async fn fetch_payout(payout_id: i64, conn: &mut SqliteConnection) -> Result<Option<Payout>, sqlx::Error> {
    let payout = sqlx::query_as("SELECT * FROM payouts WHERE id = $1").bind(payout_id).fetch_optional(conn).await?;
    Ok(payout)
}

pub async fn fetch_payouts_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Payout>, sqlx::Error> {
    let payouts = sqlx::query_as("SELECT * FROM payouts WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(payouts)
}

/// Sets the final status of a payout, but only if it is still pending. Returns `None` if the payout does not exist or
/// has already been finalized.
pub async fn finalize_payout(
    payout_id: i64,
    status: PayoutStatus,
    transaction_id: Option<String>,
    completed_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Payout>, sqlx::Error> {
    let payout = sqlx::query_as(
        r#"
            UPDATE payouts SET
                status = $1,
                transaction_id = COALESCE($2, transaction_id),
                completed_at = $3
            WHERE id = $4 AND status = 'pending'
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(transaction_id)
    .bind(completed_at)
    .bind(payout_id)
    .fetch_optional(conn)
    .await?;
    Ok(payout)
}
