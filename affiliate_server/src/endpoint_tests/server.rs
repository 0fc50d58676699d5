use affiliate_engine::{events::EventProducers, test_utils::prepare_env::new_seeded_database};

use super::helpers::tear_down;
use crate::{config::ServerConfig, integrations::razorpay::RazorpayGateway, server::create_server_instance};

#[actix_web::test]
async fn server_starts_and_stops_on_the_configured_address() {
    let db = new_seeded_database().await;
    let config = ServerConfig::new("127.0.0.1", 0);
    let gateway = RazorpayGateway::new(config.razorpay.clone()).expect("Error creating gateway");
    let srv = create_server_instance(config, db.clone(), gateway, EventProducers::default())
        .expect("Server could not bind to its address");
    let handle = srv.handle();
    let running = actix_web::rt::spawn(srv);
    handle.stop(true).await;
    running.await.expect("Server task panicked").expect("Server exited with an error");
    tear_down(db).await;
}
