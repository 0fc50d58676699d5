use actix_web::{http::StatusCode, web, web::ServiceConfig};
use affiliate_engine::{
    db_types::{NewUser, OrderStatusType, User},
    events::EventProducers,
    test_utils::{prepare_env::new_seeded_database, FakeGateway, FAKE_GATEWAY_KEY_ID},
    traits::{LedgerDatabase, UserManagement},
    AccountApi,
    OrderFlowApi,
    SqliteDatabase,
};
use serde_json::json;

use super::helpers::{get_request, json, post_request, tear_down, valid_token};
use crate::{
    data_objects::VerifyPaymentRequest,
    routes::{CreateOrderRoute, MyOrdersRoute, VerifyPaymentRoute},
};

struct TestContext {
    db: SqliteDatabase,
    gateway: FakeGateway,
}

impl TestContext {
    async fn new() -> Self {
        let _ = env_logger::try_init().ok();
        Self { db: new_seeded_database().await, gateway: FakeGateway::new() }
    }

    fn configure(&self) -> impl FnOnce(&mut ServiceConfig) {
        let orders = OrderFlowApi::new(self.db.clone(), self.gateway.clone(), EventProducers::default());
        let accounts = AccountApi::new(self.db.clone());
        move |cfg: &mut ServiceConfig| {
            cfg.app_data(web::Data::new(orders))
                .app_data(web::Data::new(accounts))
                .service(CreateOrderRoute::<SqliteDatabase, FakeGateway>::new())
                .service(VerifyPaymentRoute::<SqliteDatabase, FakeGateway>::new())
                .service(MyOrdersRoute::<SqliteDatabase, FakeGateway>::new());
        }
    }

    async fn add_user(&self, name: &str, referrer: Option<&User>) -> (User, String) {
        let user = self
            .db
            .create_user(NewUser {
                email: format!("{}@example.com", name.to_lowercase()),
                full_name: name.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                referrer_id: referrer.map(|u| u.id),
            })
            .await
            .expect("Error creating user");
        let token = valid_token(user.id, &user.email);
        (user, token)
    }

    async fn create_order(&self, token: &str, tier: &str) -> (StatusCode, serde_json::Value) {
        let body = json!({ "package_tier": tier });
        let (status, body) = post_request(token, "/payments/create-order", &body, self.configure()).await;
        (status, json(&body))
    }

    fn signed(&self, order_id: &str, payment_id: &str) -> VerifyPaymentRequest {
        VerifyPaymentRequest {
            razorpay_order_id: order_id.to_string(),
            razorpay_payment_id: payment_id.to_string(),
            razorpay_signature: self.gateway.sign(order_id, payment_id),
        }
    }

    async fn verify(&self, token: &str, req: &VerifyPaymentRequest) -> (StatusCode, serde_json::Value) {
        let (status, body) = post_request(token, "/payments/verify-payment", req, self.configure()).await;
        (status, json(&body))
    }
}

#[actix_web::test]
async fn create_order() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.add_user("Alice", None).await;
    let (status, order) = ctx.create_order(&token, "silver").await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["order_id"], "order_fake_1");
    assert_eq!(order["amount"], 299_999);
    assert_eq!(order["currency"], "INR");
    assert_eq!(order["key"], FAKE_GATEWAY_KEY_ID);
    assert_eq!(order["package_tier"], "silver");
    assert_eq!(order["package_name"], "Silver Package");

    let (status, body) = get_request(&token, "/payments/orders", ctx.configure()).await;
    assert_eq!(status, StatusCode::OK);
    let orders = json(&body);
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["status"], "pending");
    tear_down(ctx.db).await;
}

#[actix_web::test]
async fn create_order_errors() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.add_user("Alice", None).await;
    let (status, body) = ctx.create_order("", "silver").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");

    let (status, body) = ctx.create_order(&token, "diamond").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    ctx.gateway.set_offline(true);
    let (status, body) = ctx.create_order(&token, "gold").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("payment gateway"));
    ctx.gateway.set_offline(false);
    assert_eq!(ctx.gateway.orders_created(), 0);
    let (_, body) = get_request(&token, "/payments/orders", ctx.configure()).await;
    assert!(json(&body).as_array().unwrap().is_empty());
    tear_down(ctx.db).await;
}

#[actix_web::test]
async fn verify_payment() {
    let ctx = TestContext::new().await;
    let (root, _) = ctx.add_user("Root", None).await;
    let (buyer, token) = ctx.add_user("Buyer", Some(&root)).await;
    let (_, order) = ctx.create_order(&token, "gold").await;
    let order_id = order["order_id"].as_str().unwrap();

    let confirmation = ctx.signed(order_id, "pay_001");
    let (status, body) = ctx.verify(&token, &confirmation).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Payment verified successfully");
    assert_eq!(body["status"], "completed");
    assert!(body["order_id"].is_i64());
    assert!(body.get("commissions").is_none());

    let order = ctx.db.fetch_order_by_remote_id(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Completed);
    assert_eq!(order.remote_payment_id.as_deref(), Some("pay_001"));
    let buyer = ctx.db.fetch_user(buyer.id).await.unwrap().unwrap();
    assert!(buyer.package_tier.is_some());

    // Confirming a second time is a conflict, not a second settlement
    let (status, body) = ctx.verify(&token, &confirmation).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already been completed"));
    tear_down(ctx.db).await;
}

#[actix_web::test]
async fn verify_payment_with_bad_signature() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.add_user("Alice", None).await;
    let (_, order) = ctx.create_order(&token, "platinum").await;
    let order_id = order["order_id"].as_str().unwrap();

    let mut confirmation = ctx.signed(order_id, "pay_001");
    confirmation.razorpay_payment_id = "pay_002".to_string();
    let (status, body) = ctx.verify(&token, &confirmation).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid payment signature");

    let order = ctx.db.fetch_order_by_remote_id(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Pending);
    tear_down(ctx.db).await;
}

#[actix_web::test]
async fn verify_someone_elses_order() {
    let ctx = TestContext::new().await;
    let (_, alice) = ctx.add_user("Alice", None).await;
    let (_, mallory) = ctx.add_user("Mallory", None).await;
    let (_, order) = ctx.create_order(&alice, "silver").await;
    let order_id = order["order_id"].as_str().unwrap();

    let (status, _) = ctx.verify(&mallory, &ctx.signed(order_id, "pay_001")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = ctx.verify(&mallory, &ctx.signed("order_does_not_exist", "pay_001")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let order = ctx.db.fetch_order_by_remote_id(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Pending);
    tear_down(ctx.db).await;
}

#[actix_web::test]
async fn forged_confirmation_for_an_unknown_order() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.add_user("Mallory", None).await;
    let forged = VerifyPaymentRequest {
        razorpay_order_id: "order_does_not_exist".to_string(),
        razorpay_payment_id: "pay_001".to_string(),
        razorpay_signature: "00".repeat(32),
    };
    let (status, body) = ctx.verify(&token, &forged).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid payment signature");
    tear_down(ctx.db).await;
}
