use actix_web::{http::StatusCode, web, web::ServiceConfig};
use affiliate_engine::{test_utils::prepare_env::new_seeded_database, AccountApi, CatalogApi, SqliteDatabase};
use serde_json::json;

use super::helpers::{get_auth_config, get_request, json, post_raw, post_request, tear_down};
use crate::{
    auth::TokenIssuer,
    config::ServerOptions,
    routes::{LoginRoute, MeRoute, MyReferralLinkRoute, PackagesRoute, RegisterRoute},
};

fn configure(db: &SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    let accounts = AccountApi::new(db.clone());
    let catalog = CatalogApi::new(db.clone());
    let options = ServerOptions { frontend_url: "https://affiliate.example.com/".to_string() };
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(accounts))
            .app_data(web::Data::new(catalog))
            .app_data(web::Data::new(options))
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(MeRoute::<SqliteDatabase>::new())
            .service(MyReferralLinkRoute::<SqliteDatabase>::new())
            .service(PackagesRoute::<SqliteDatabase>::new());
    }
}

async fn register(db: &SqliteDatabase, body: serde_json::Value) -> (StatusCode, String) {
    post_request("", "/auth/register", &body, configure(db)).await
}

async fn login(db: &SqliteDatabase, email: &str, password: &str) -> (StatusCode, String) {
    let body = json!({ "email": email, "password": password });
    post_request("", "/auth/login", &body, configure(db)).await
}

#[actix_web::test]
async fn register_and_log_in() {
    let db = new_seeded_database().await;
    let (status, body) =
        register(&db, json!({"email": " Alice@Example.com ", "full_name": "Alice", "password": "pa55word"})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let alice = json(&body);
    assert_eq!(alice["email"], "alice@example.com");
    assert_eq!(alice["is_active"], true);
    assert!(alice["referrer_id"].is_null());
    assert!(alice.get("password_hash").is_none());

    let (status, body) = login(&db, "alice@example.com", "pa55word").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = json(&body);
    assert_eq!(token["token_type"], "bearer");
    assert_eq!(token["user"]["id"], alice["id"]);
    let access_token = token["access_token"].as_str().unwrap();
    let claims = TokenIssuer::new(&get_auth_config()).validate(access_token).expect("Token did not validate");
    assert_eq!(claims.user_id, alice["id"].as_i64().unwrap());
    assert_eq!(claims.email, "alice@example.com");

    let (status, body) = get_request(access_token, "/auth/me", configure(&db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["full_name"], "Alice");
    tear_down(db).await;
}

#[actix_web::test]
async fn register_with_referrer() {
    let db = new_seeded_database().await;
    let (_, body) = register(&db, json!({"email": "root@example.com", "full_name": "Root", "password": "x"})).await;
    let root_id = json(&body)["id"].as_i64().unwrap();
    let (status, body) = register(
        &db,
        json!({"email": "child@example.com", "full_name": "Child", "password": "y", "referrer_id": root_id}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["referrer_id"], root_id);
    tear_down(db).await;
}

#[actix_web::test]
async fn invalid_registrations() {
    let db = new_seeded_database().await;
    let (status, _) = register(&db, json!({"email": "bob@example.com", "full_name": "Bob", "password": "x"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = register(&db, json!({"email": "BOB@example.com", "full_name": "Bob 2", "password": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Email already registered");

    let (status, body) = register(
        &db,
        json!({"email": "carol@example.com", "full_name": "Carol", "password": "x", "referrer_id": 4242}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["error"], "Invalid referral code");

    let (status, _) = register(&db, json!({"email": "not-an-email", "full_name": "Dave", "password": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = register(&db, json!({"email": "erin@example.com", "full_name": "Erin", "password": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_raw("", "/auth/register", r#"{"email": "frank@example.com""#, configure(&db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Could not read request body"));
    tear_down(db).await;
}

#[actix_web::test]
async fn bad_credentials() {
    let db = new_seeded_database().await;
    register(&db, json!({"email": "gina@example.com", "full_name": "Gina", "password": "right"})).await;
    let (status, body) = login(&db, "gina@example.com", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json(&body)["error"], "Authentication Error. Incorrect email or password");
    let (status, body) = login(&db, "nobody@example.com", "right").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json(&body)["error"], "Authentication Error. Incorrect email or password");
    tear_down(db).await;
}

#[actix_web::test]
async fn referral_link() {
    let db = new_seeded_database().await;
    let (_, body) = register(&db, json!({"email": "hal@example.com", "full_name": "Hal", "password": "pw"})).await;
    let id = json(&body)["id"].as_i64().unwrap();
    let (_, body) = login(&db, "hal@example.com", "pw").await;
    let token = json(&body)["access_token"].as_str().unwrap().to_string();
    let (status, body) = get_request(&token, "/auth/referral-link", configure(&db)).await;
    assert_eq!(status, StatusCode::OK);
    let link = json(&body);
    assert_eq!(link["referral_link"], format!("https://affiliate.example.com/signup?ref={id}"));
    assert_eq!(link["referral_code"], id.to_string());
    tear_down(db).await;
}

#[actix_web::test]
async fn list_packages() {
    let db = new_seeded_database().await;
    let (status, body) = get_request("", "/packages", configure(&db)).await;
    assert_eq!(status, StatusCode::OK);
    let packages = json(&body);
    let packages = packages.as_array().unwrap();
    let tiers = packages.iter().map(|p| p["tier"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(tiers, vec!["silver", "gold", "platinum"]);
    let silver = &packages[0];
    assert_eq!(silver["base_price"], 254_237);
    assert_eq!(silver["gst_amount"], 45_762);
    assert_eq!(silver["final_price"], 299_999);
    assert_eq!(silver["direct_commission"], 50_000);
    assert_eq!(silver["indirect_commission"], 25_000);
    assert!(silver["features"].is_array());
    tear_down(db).await;
}
