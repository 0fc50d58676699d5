use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use affiliate_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    AccountApi,
    CatalogApi,
    DashboardApi,
    OrderFlowApi,
    PayoutApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::TokenIssuer,
    config::{ServerConfig, ServerOptions},
    errors::{json_error_handler, ServerError},
    integrations::razorpay::RazorpayGateway,
    routes::{
        health,
        CreateOrderRoute,
        DashboardCommissionsRoute,
        DashboardReferralsRoute,
        DashboardStatsRoute,
        LoginRoute,
        MeRoute,
        MyOrdersRoute,
        MyPayoutsRoute,
        MyReferralLinkRoute,
        PackagesRoute,
        RegisterRoute,
        VerifyPaymentRoute,
    },
};

const EVENT_BUFFER_SIZE: usize = 128;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let inserted = CatalogApi::new(db.clone())
        .seed_default_packages()
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("📦️ Package catalog is ready. {inserted} new packages were added.");
    let gateway =
        RazorpayGateway::new(config.razorpay.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, create_event_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await?;
    Ok(())
}

/// The hooks that run after every settlement. For now, these just keep an audit trail in the log.
pub fn create_event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_order_completed(|ev| {
        Box::pin(async move {
            info!(
                "📬️ Order {} (#{}) completed for user #{}. {} paid, {} commissions created.",
                ev.order.remote_order_id,
                ev.order.id,
                ev.order.user_id,
                ev.order.amount,
                ev.commissions.len()
            );
        })
    });
    hooks.on_commission_earned(|ev| {
        Box::pin(async move {
            info!(
                "📬️ User #{} earned an {} commission of {} from user #{}'s purchase",
                ev.commission.earner_id, ev.commission.level, ev.commission.amount, ev.buyer_id
            );
        })
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: RazorpayGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let options = ServerOptions::from_config(&config);
    let bind_address = (config.host.clone(), config.port);
    let auth_config = config.auth;
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), gateway.clone(), producers.clone());
        let accounts_api = AccountApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let dashboard_api = DashboardApi::new(db.clone());
        let payout_api = PayoutApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&auth_config);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("als::access_log"))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(dashboard_api))
            .app_data(web::Data::new(payout_api))
            .app_data(web::Data::new(jwt_signer))
            .app_data(web::Data::new(options.clone()))
            .service(health)
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(MeRoute::<SqliteDatabase>::new())
            .service(MyReferralLinkRoute::<SqliteDatabase>::new())
            .service(PackagesRoute::<SqliteDatabase>::new())
            .service(CreateOrderRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(VerifyPaymentRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(MyOrdersRoute::<SqliteDatabase, RazorpayGateway>::new())
            .service(DashboardStatsRoute::<SqliteDatabase>::new())
            .service(DashboardCommissionsRoute::<SqliteDatabase>::new())
            .service(DashboardReferralsRoute::<SqliteDatabase>::new())
            .service(MyPayoutsRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind(bind_address)?
    .run();
    Ok(srv)
}
