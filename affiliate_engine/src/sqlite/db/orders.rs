use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order},
    traits::{LedgerDatabaseError, PaymentConfirmation},
};

/// Inserts a new order into the database using the given connection. The order is always created in `pending`
/// status.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, LedgerDatabaseError> {
    let remote_id = order.remote_order_id.clone();
    let result: Result<Order, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO orders (
                user_id,
                package_id,
                remote_order_id,
                amount,
                currency,
                receipt,
                status,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
            RETURNING *;
        "#,
    )
    .bind(order.user_id)
    .bind(order.package_id)
    .bind(order.remote_order_id)
    .bind(order.amount)
    .bind(order.currency)
    .bind(order.receipt)
    .bind(Utc::now())
    .fetch_one(conn)
    .await;
    match result {
        Ok(order) => {
            debug!("🗃️ Order [{}] inserted with id {}", order.remote_order_id, order.id);
            Ok(order)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(LedgerDatabaseError::OrderAlreadyExists(remote_id))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_order_by_remote_id(
    remote_order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE remote_order_id = $1")
        .bind(remote_order_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Moves the order from `pending` to `completed`, recording the payment details.
///
/// This is a single compare-and-set statement: the update only matches while the order is still pending, so if
/// several callers race, exactly one of them gets the order back. Everyone else gets `None` and must work out why
/// for themselves.
///
/// Inside a transaction, make this the *first* statement. SQLite then takes the write lock up front, and competing
/// transactions wait on the busy timeout instead of failing on a stale read snapshot.
pub async fn mark_completed(
    confirmation: &PaymentConfirmation,
    completed_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = 'completed',
                remote_payment_id = $1,
                remote_signature = $2,
                completed_at = $3
            WHERE remote_order_id = $4 AND status = 'pending'
            RETURNING *;
        "#,
    )
    .bind(confirmation.remote_payment_id.as_str())
    .bind(confirmation.signature.as_str())
    .bind(completed_at)
    .bind(confirmation.remote_order_id.as_str())
    .fetch_optional(conn)
    .await?;
    if let Some(o) = &order {
        trace!("🗃️ Order [{}] marked as completed", o.remote_order_id);
    }
    Ok(order)
}
