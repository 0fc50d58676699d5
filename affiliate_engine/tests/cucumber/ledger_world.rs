use std::collections::HashMap;

use affiliate_engine::{
    db_types::User,
    events::EventProducers,
    order_objects::ConfirmedOrder,
    test_utils::{
        prepare_env::{create_database, random_db_path, run_migrations},
        FakeGateway,
    },
    CatalogApi,
    OrderFlowApi,
    OrderFlowError,
    SqliteDatabase,
};
use cucumber::World;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use log::*;

#[derive(Default, Debug, World)]
pub struct LedgerWorld {
    pub system: Option<LedgerSystem>,
}

#[derive(Debug)]
pub struct LedgerSystem {
    pub db_path: String,
    pub api: OrderFlowApi<SqliteDatabase, FakeGateway>,
    pub users: HashMap<String, User>,
    pub last_order: Option<String>,
    pub last_results: Vec<Result<ConfirmedOrder, OrderFlowError>>,
}

impl LedgerWorld {
    pub fn system(&self) -> &LedgerSystem {
        self.system.as_ref().expect("Ledger not initialised")
    }

    pub fn system_mut(&mut self) -> &mut LedgerSystem {
        self.system.as_mut().expect("Ledger not initialised")
    }

    pub fn api(&self) -> &OrderFlowApi<SqliteDatabase, FakeGateway> {
        &self.system().api
    }

    pub fn user(&self, name: &str) -> &User {
        self.system().users.get(name).unwrap_or_else(|| panic!("No user called {name}"))
    }

    pub fn last_order(&self) -> String {
        self.system().last_order.clone().expect("No order has been opened")
    }
}

impl LedgerSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        create_database(&url).await;
        run_migrations(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        CatalogApi::new(db.clone()).seed_default_packages().await.expect("Error seeding packages");
        debug!("🚀️ Created database: {url}");
        let api = OrderFlowApi::new(db, FakeGateway::new(), EventProducers::default());
        Self { db_path: url, api, users: HashMap::new(), last_order: None, last_results: Vec::new() }
    }
}

impl LedgerSystem {
    /// Closes the pool and deletes the scenario's database file.
    pub async fn dispose(&mut self) {
        if let Err(e) = self.api.db_mut().close().await {
            error!("🚀️ Failed to close database: {e}");
        }
        if let Err(e) = Sqlite::drop_database(&self.db_path).await {
            warn!("🚀️ Could not remove database {}: {e}", self.db_path);
        }
    }
}
