use actix_web::{
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use affiliate_engine::SqliteDatabase;
use chrono::Duration;
use log::*;
use serde::Serialize;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::AuthConfig,
    errors::json_error_handler,
};

// Signs the tokens used in the endpoint tests. DO NOT re-use this secret anywhere.
const TEST_JWT_SECRET: &str = "endpoint-tests-only-8c1f0e7d2b9a4c6e";

pub fn get_auth_config() -> AuthConfig {
    AuthConfig::new(TEST_JWT_SECRET, Duration::minutes(30))
}

pub fn issue_token(claims: JwtClaims, lifetime: Duration) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token_with_lifetime(claims, lifetime).expect("Failed to sign token")
}

pub fn valid_token(user_id: i64, email: &str) -> String {
    issue_token(JwtClaims::new(user_id, email), Duration::hours(1))
}

async fn send<F>(req: TestRequest, auth_token: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = if auth_token.is_empty() {
        req
    } else {
        req.insert_header((header::AUTHORIZATION, format!("Bearer {auth_token}")))
    };
    let app = App::new()
        .app_data(web::Data::new(TokenIssuer::new(&get_auth_config())))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub async fn get_request<F>(auth_token: &str, path: &str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    send(TestRequest::get().uri(path), auth_token, configure).await
}

pub async fn post_request<F, T>(auth_token: &str, path: &str, body: &T, configure: F) -> (StatusCode, String)
where
    F: FnOnce(&mut ServiceConfig),
    T: Serialize,
{
    send(TestRequest::post().uri(path).set_json(body), auth_token, configure).await
}

pub async fn post_raw<F>(auth_token: &str, path: &str, body: &'static str, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::post().uri(path).insert_header(header::ContentType::json()).set_payload(body);
    send(req, auth_token, configure).await
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Response is not JSON ({e}): {body}"))
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = affiliate_engine::traits::LedgerDatabase::url(&db).to_string();
    db.close().await.expect("Error closing database");
    if let Some(path) = url.strip_prefix("sqlite://") {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("🚀️ Could not remove test database {path}. {e}");
        }
    }
}
