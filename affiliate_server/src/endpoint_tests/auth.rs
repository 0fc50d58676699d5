use actix_web::{http::StatusCode, web, web::ServiceConfig};
use affiliate_engine::AccountApi;
use chrono::Duration;

use super::{
    helpers::{get_request, issue_token, json, valid_token},
    mocks::{ledger_with_user, user, MockLedger},
};
use crate::{
    auth::{JwtClaims, TokenIssuer},
    config::AuthConfig,
    routes::{health, MeRoute},
};

fn configure_with(ledger: MockLedger) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(AccountApi::new(ledger))).service(MeRoute::<MockLedger>::new());
    }
}

fn configure(cfg: &mut ServiceConfig) {
    configure_with(ledger_with_user(user(1, "Alice", None, true)))(cfg)
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/health", |cfg| {
        cfg.service(health);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "healthy");
}

#[actix_web::test]
async fn me_without_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/auth/me", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json(&body)["error"], "Authentication Error. Not authenticated");
}

#[actix_web::test]
async fn me_with_garbage_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("this.is.not-a-jwt", "/auth/me", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Authentication Error."));
}

#[actix_web::test]
async fn me_with_tampered_token() {
    let _ = env_logger::try_init().ok();
    let mut token = valid_token(1, "alice@example.com");
    token.replace_range(token.len() - 10..token.len() - 5, "AAAAA");
    let (status, _) = get_request(&token, "/auth/me", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn me_with_expired_token() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(JwtClaims::new(1, "alice@example.com"), Duration::minutes(-10));
    let (status, _) = get_request(&token, "/auth/me", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn me_with_token_from_another_server() {
    let _ = env_logger::try_init().ok();
    let other = TokenIssuer::new(&AuthConfig::new("some-other-server-secret-0123456789", Duration::minutes(30)));
    let token = other.issue_token(JwtClaims::new(1, "alice@example.com")).unwrap();
    let (status, _) = get_request(&token, "/auth/me", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn me_with_valid_token() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(1, "alice@example.com");
    let (status, body) = get_request(&token, "/auth/me", configure).await;
    assert_eq!(status, StatusCode::OK);
    let user = json(&body);
    assert_eq!(user["id"], 1);
    assert_eq!(user["email"], "alice@example.com");
    assert_eq!(user["full_name"], "Alice");
    assert!(user.get("password_hash").is_none());
}

#[actix_web::test]
async fn me_for_inactive_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(2, "bob@example.com");
    let ledger = ledger_with_user(user(2, "Bob", None, false));
    let (status, body) = get_request(&token, "/auth/me", configure_with(ledger)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json(&body)["error"], "Authentication Error. Inactive user");
}

#[actix_web::test]
async fn me_for_deleted_user() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(99, "ghost@example.com");
    let (status, _) = get_request(&token, "/auth/me", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
