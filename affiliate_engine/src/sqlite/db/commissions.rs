use affiliate_common::Paise;
use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{db_types::Commission, ledger::CommissionShare, traits::EarningsSummary};

pub async fn insert_commission(
    order_id: i64,
    share: &CommissionShare,
    created_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Commission, sqlx::Error> {
    let commission: Commission = sqlx::query_as(
        r#"
            INSERT INTO commissions (earner_id, order_id, level, amount, paid_out, created_at)
            VALUES ($1, $2, $3, $4, 0, $5)
            RETURNING *;
        "#,
    )
    .bind(share.earner_id)
    .bind(order_id)
    .bind(share.level)
    .bind(share.amount)
    .bind(created_at)
    .fetch_one(conn)
    .await?;
    trace!(
        "🗃️ {} commission of {} recorded for user #{} on order #{order_id}",
        commission.level,
        commission.amount,
        commission.earner_id
    );
    Ok(commission)
}

pub async fn fetch_commissions_for_earner(
    earner_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Commission>, sqlx::Error> {
    let commissions =
        sqlx::query_as("SELECT * FROM commissions WHERE earner_id = $1 ORDER BY created_at DESC, id DESC")
            .bind(earner_id)
            .fetch_all(conn)
            .await?;
    Ok(commissions)
}

pub async fn fetch_commissions_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Commission>, sqlx::Error> {
    let commissions = sqlx::query_as("SELECT * FROM commissions WHERE order_id = $1 ORDER BY level ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(commissions)
}

pub async fn fetch_commissions_by_id(ids: &[i64], conn: &mut SqliteConnection) -> Result<Vec<Commission>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM commissions WHERE id IN (");
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(") ORDER BY id ASC");
    let commissions = builder.build_query_as::<Commission>().fetch_all(conn).await?;
    Ok(commissions)
}

/// Flags the given commissions as paid out under `payout_id`. Commissions that are already paid out are skipped, and
/// the number of rows that were actually updated is returned.
pub async fn mark_paid_out(
    ids: &[i64],
    payout_id: i64,
    paid_out_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE commissions SET paid_out = 1, paid_out_at = ");
    builder.push_bind(paid_out_at);
    builder.push(", payout_id = ");
    builder.push_bind(payout_id);
    builder.push(" WHERE paid_out = 0 AND id IN (");
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(")");
    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}

pub async fn earnings_summary(earner_id: i64, conn: &mut SqliteConnection) -> Result<EarningsSummary, sqlx::Error> {
    let (total_earned, total_paid_out, direct, indirect, count): (i64, i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(amount), 0),
            COALESCE(SUM(CASE WHEN paid_out THEN amount ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN level = 1 THEN amount ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN level = 2 THEN amount ELSE 0 END), 0),
            COUNT(*)
        FROM commissions
        WHERE earner_id = $1
        "#,
    )
    .bind(earner_id)
    .fetch_one(conn)
    .await?;
    let total_earned = Paise::from(total_earned);
    let total_paid_out = Paise::from(total_paid_out);
    Ok(EarningsSummary {
        total_earned,
        total_paid_out,
        available_balance: total_earned - total_paid_out,
        direct_earnings: Paise::from(direct),
        indirect_earnings: Paise::from(indirect),
        total_commissions: count,
    })
}
