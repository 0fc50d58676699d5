use actix_web::{http::StatusCode, web, web::ServiceConfig};
use affiliate_common::Paise;
use affiliate_engine::{
    db_types::{Commission, CommissionLevel},
    traits::{EarningsSummary, ReferralCounts},
    AccountApi,
    DashboardApi,
    PayoutApi,
};
use chrono::{TimeZone, Utc};

use super::{
    helpers::{get_request, json, valid_token},
    mocks::{ledger_with_user, user, MockLedger},
};
use crate::routes::{DashboardCommissionsRoute, DashboardReferralsRoute, DashboardStatsRoute, MyPayoutsRoute};

const ROOT_ID: i64 = 1;

fn commission(id: i64, order_id: i64, level: CommissionLevel, amount: i64) -> Commission {
    Commission {
        id,
        earner_id: ROOT_ID,
        order_id,
        level,
        amount: Paise::from(amount),
        paid_out: false,
        paid_out_at: None,
        payout_id: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap(),
    }
}

fn dashboard_ledger() -> MockLedger {
    let mut ledger = ledger_with_user(user(ROOT_ID, "Root", None, true));
    ledger.expect_fetch_earnings_summary().returning(|_| {
        Ok(EarningsSummary {
            total_earned: Paise::from(175_000),
            total_paid_out: Paise::from(50_000),
            available_balance: Paise::from(125_000),
            direct_earnings: Paise::from(50_000),
            indirect_earnings: Paise::from(125_000),
            total_commissions: 3,
        })
    });
    ledger.expect_count_referrals().returning(|_| Ok(ReferralCounts::new(2, 2)));
    ledger.expect_fetch_commissions_for_earner().returning(|_| {
        Ok(vec![
            commission(3, 12, CommissionLevel::Indirect, 75_000),
            commission(1, 10, CommissionLevel::Direct, 50_000),
        ])
    });
    ledger.expect_fetch_direct_referrals().returning(|_| Ok(vec![user(2, "Mid", Some(ROOT_ID), true)]));
    ledger
        .expect_fetch_indirect_referrals()
        .returning(|_| Ok(vec![user(3, "Leaf1", Some(2), true), user(4, "Leaf2", Some(2), true)]));
    ledger
}

fn configure(cfg: &mut ServiceConfig) {
    let accounts = AccountApi::new(ledger_with_user(user(ROOT_ID, "Root", None, true)));
    let dashboard = DashboardApi::new(dashboard_ledger());
    cfg.app_data(web::Data::new(accounts))
        .app_data(web::Data::new(dashboard))
        .service(DashboardStatsRoute::<MockLedger>::new())
        .service(DashboardCommissionsRoute::<MockLedger>::new())
        .service(DashboardReferralsRoute::<MockLedger>::new());
}

#[actix_web::test]
async fn stats() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(ROOT_ID, "root@example.com");
    let (status, body) = get_request(&token, "/dashboard/stats", configure).await;
    assert_eq!(status, StatusCode::OK);
    let stats = json(&body);
    assert_eq!(stats["user"]["full_name"], "Root");
    assert_eq!(stats["earnings"]["total_earned"], 175_000);
    assert_eq!(stats["earnings"]["available_balance"], 125_000);
    assert_eq!(stats["earnings"]["total_commissions"], 3);
    assert_eq!(stats["referrals"]["direct_count"], 2);
    assert_eq!(stats["referrals"]["total_count"], 4);
}

#[actix_web::test]
async fn commissions() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(ROOT_ID, "root@example.com");
    let (status, body) = get_request(&token, "/dashboard/commissions", configure).await;
    assert_eq!(status, StatusCode::OK);
    let commissions = json(&body);
    let commissions = commissions.as_array().unwrap();
    assert_eq!(commissions.len(), 2);
    assert_eq!(commissions[0]["level"], 2);
    assert_eq!(commissions[0]["amount"], 75_000);
    assert_eq!(commissions[1]["order_id"], 10);
    assert_eq!(commissions[1]["paid_out"], false);
}

#[actix_web::test]
async fn referrals() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(ROOT_ID, "root@example.com");
    let (status, body) = get_request(&token, "/dashboard/referrals", configure).await;
    assert_eq!(status, StatusCode::OK);
    let network = json(&body);
    assert_eq!(network["direct_referrals"].as_array().unwrap().len(), 1);
    assert_eq!(network["direct_referrals"][0]["full_name"], "Mid");
    let indirect = network["indirect_referrals"].as_array().unwrap();
    assert_eq!(indirect.iter().map(|u| u["id"].as_i64().unwrap()).collect::<Vec<_>>(), vec![3, 4]);
}

#[actix_web::test]
async fn dashboard_requires_a_token() {
    let _ = env_logger::try_init().ok();
    for path in ["/dashboard/stats", "/dashboard/commissions", "/dashboard/referrals"] {
        let (status, _) = get_request("", path, configure).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path} should require a token");
    }
}

#[actix_web::test]
async fn inactive_users_see_nothing() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(5, "sleepy@example.com");
    let (status, _) = get_request(&token, "/dashboard/stats", |cfg| {
        let accounts = AccountApi::new(ledger_with_user(user(5, "Sleepy", None, false)));
        // The dashboard backend is never reached, so it has no expectations
        let dashboard = DashboardApi::new(MockLedger::new());
        cfg.app_data(web::Data::new(accounts))
            .app_data(web::Data::new(dashboard))
            .service(DashboardStatsRoute::<MockLedger>::new());
    })
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn payouts_for_a_user_with_none() {
    let _ = env_logger::try_init().ok();
    let token = valid_token(ROOT_ID, "root@example.com");
    let (status, body) = get_request(&token, "/dashboard/payouts", |cfg| {
        let accounts = AccountApi::new(ledger_with_user(user(ROOT_ID, "Root", None, true)));
        let mut ledger = MockLedger::new();
        ledger.expect_fetch_payouts_for_user().times(1).returning(|_| Ok(vec![]));
        cfg.app_data(web::Data::new(accounts))
            .app_data(web::Data::new(PayoutApi::new(ledger)))
            .service(MyPayoutsRoute::<MockLedger>::new());
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}
