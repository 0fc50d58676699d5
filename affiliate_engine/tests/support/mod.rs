#![allow(dead_code)]
use affiliate_engine::{
    db_types::{NewUser, User},
    events::EventProducers,
    test_utils::{prepare_env::new_seeded_database, FakeGateway},
    traits::{LedgerDatabase, PaymentConfirmation, UserManagement},
    OrderFlowApi,
    SqliteDatabase,
};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub type TestApi = OrderFlowApi<SqliteDatabase, FakeGateway>;

pub async fn setup() -> TestApi {
    setup_with_producers(EventProducers::default()).await
}

pub async fn setup_with_producers(producers: EventProducers) -> TestApi {
    let db = new_seeded_database().await;
    OrderFlowApi::new(db, FakeGateway::new(), producers)
}

pub async fn tear_down(mut api: TestApi) {
    let url = api.db().url().to_string();
    if let Err(e) = api.db_mut().close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    Sqlite::drop_database(&url).await.unwrap();
}

/// Creates a user directly in the database. The password hash is a placeholder, so these users cannot log in.
pub async fn add_user(db: &SqliteDatabase, name: &str, referrer: Option<&User>) -> User {
    let user = NewUser {
        email: format!("{}@example.com", name.to_lowercase()),
        full_name: name.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        referrer_id: referrer.map(|u| u.id),
    };
    db.create_user(user).await.expect("Error creating user")
}

/// A confirmation for the order, correctly signed by the fake gateway.
pub fn signed_confirmation(api: &TestApi, remote_order_id: &str, remote_payment_id: &str) -> PaymentConfirmation {
    let signature = api.gateway().sign(remote_order_id, remote_payment_id);
    PaymentConfirmation::new(remote_order_id, remote_payment_id, signature.as_str())
}
