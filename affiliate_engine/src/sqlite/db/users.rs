use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, PackageTier, User},
    referrals::ReferrerLookup,
    traits::{LedgerDatabaseError, ReferralCounts},
};

/// Inserts a new user. The referrer, if given, must already exist, which is what keeps the referral relation a forest:
/// a brand-new user has no descendants, so linking them to an existing user can never close a cycle.
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, LedgerDatabaseError> {
    if let Some(referrer_id) = user.referrer_id {
        if fetch_user(referrer_id, conn).await?.is_none() {
            return Err(LedgerDatabaseError::ReferrerNotFound(referrer_id));
        }
    }
    let now = Utc::now();
    let email = user.email.clone();
    let result: Result<User, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO users (email, full_name, password_hash, referrer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(user.email)
    .bind(user.full_name)
    .bind(user.password_hash)
    .bind(user.referrer_id)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => {
            debug!("🗃️ User #{} created (referrer: {:?})", user.id, user.referrer_id);
            Ok(user)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(LedgerDatabaseError::EmailAlreadyExists(email)),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn fetch_direct_referrals(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<User>, sqlx::Error> {
    let users = sqlx::query_as("SELECT * FROM users WHERE referrer_id = $1 ORDER BY created_at ASC, id ASC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(users)
}

/// The grandchildren of `user_id` in the referral forest. Only one level below the direct referrals is considered.
pub async fn fetch_indirect_referrals(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<User>, sqlx::Error> {
    let users = sqlx::query_as(
        r#"
        SELECT u.* FROM users u
        JOIN users parent ON u.referrer_id = parent.id
        WHERE parent.referrer_id = $1
        ORDER BY u.created_at ASC, u.id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(users)
}

pub async fn count_referrals(user_id: i64, conn: &mut SqliteConnection) -> Result<ReferralCounts, sqlx::Error> {
    let (direct, indirect): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users WHERE referrer_id = $1) AS direct_count,
            (SELECT COUNT(*) FROM users u JOIN users parent ON u.referrer_id = parent.id WHERE parent.referrer_id = $1)
                AS indirect_count
        "#,
    )
    .bind(user_id)
    .fetch_one(conn)
    .await?;
    Ok(ReferralCounts::new(direct, indirect))
}

/// Records that the user now holds `tier`. A later purchase replaces the tier of an earlier one.
pub async fn grant_package(
    user_id: i64,
    tier: PackageTier,
    purchased_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), LedgerDatabaseError> {
    let result = sqlx::query("UPDATE users SET package_tier = $1, purchased_at = $2, updated_at = $2 WHERE id = $3")
        .bind(tier)
        .bind(purchased_at)
        .bind(user_id)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(LedgerDatabaseError::UserNotFound(user_id));
    }
    trace!("🗃️ User #{user_id} granted the {tier} package");
    Ok(())
}

impl ReferrerLookup for SqliteConnection {
    type Error = sqlx::Error;

    async fn referrer_of(&mut self, user_id: i64) -> Result<Option<i64>, Self::Error> {
        let row: Option<(Option<i64>,)> = sqlx::query_as("SELECT referrer_id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self)
            .await?;
        Ok(row.and_then(|(referrer,)| referrer))
    }
}
