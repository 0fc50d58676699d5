use affiliate_common::Paise;
use affiliate_engine::{
    db_types::{NewUser, OrderStatusType, PackageTier},
    traits::{CommissionManagement, PaymentConfirmation, UserManagement},
    OrderFlowError,
};
use cucumber::{given, then, when};
use futures::future::join_all;
use log::*;

use crate::cucumber::LedgerWorld;

async fn add_user(world: &mut LedgerWorld, name: String, referrer: Option<String>) {
    let referrer_id = referrer.map(|r| world.user(&r).id);
    let new_user = NewUser {
        email: format!("{}@example.com", name.to_lowercase()),
        full_name: name.clone(),
        password_hash: "unused".into(),
        referrer_id,
    };
    let user = world.api().db().create_user(new_user).await.expect("Error creating user");
    debug!("🚀️ Created user {name} (#{})", user.id);
    world.system_mut().users.insert(name, user);
}

#[given(expr = "a user '{word}'")]
async fn user_without_referrer(world: &mut LedgerWorld, name: String) {
    add_user(world, name, None).await;
}

#[given(expr = "a user '{word}' referred by '{word}'")]
async fn user_with_referrer(world: &mut LedgerWorld, name: String, referrer: String) {
    add_user(world, name, Some(referrer)).await;
}

#[when(expr = "'{word}' opens an order for the {word} package")]
async fn open_order(world: &mut LedgerWorld, name: String, tier: String) {
    let tier = tier.parse::<PackageTier>().expect("Unknown tier");
    let user_id = world.user(&name).id;
    let opened = world.api().open_order(user_id, tier).await.expect("Error opening order");
    world.system_mut().last_order = Some(opened.remote_order_id);
}

fn signed(world: &LedgerWorld, payment_id: &str) -> PaymentConfirmation {
    let order_id = world.last_order();
    let signature = world.api().gateway().sign(&order_id, payment_id);
    PaymentConfirmation { remote_order_id: order_id, remote_payment_id: payment_id.to_string(), signature }
}

#[when(expr = "the gateway confirms payment [{word}] for the last order")]
async fn confirm(world: &mut LedgerWorld, payment_id: String) {
    let confirmation = signed(world, &payment_id);
    let result = world.api().confirm_order(confirmation).await;
    world.system_mut().last_results = vec![result];
}

#[when(expr = "the gateway confirms payment [{word}] for the last order {int} times at once")]
async fn confirm_concurrently(world: &mut LedgerWorld, payment_id: String, n: usize) {
    let confirmation = signed(world, &payment_id);
    let api = world.api();
    let results = join_all((0..n).map(|_| api.confirm_order(confirmation.clone()))).await;
    world.system_mut().last_results = results;
}

#[when(expr = "a forged confirmation for payment [{word}] arrives for the last order")]
async fn forged(world: &mut LedgerWorld, payment_id: String) {
    let mut confirmation = signed(world, &payment_id);
    confirmation.signature = "ab".repeat(32);
    let result = world.api().confirm_order(confirmation).await;
    world.system_mut().last_results = vec![result];
}

#[then(expr = "the last order is {word}")]
async fn order_status(world: &mut LedgerWorld, status: String) {
    let order = world.api().order_by_remote_id(&world.last_order()).await.expect("Order not found");
    let expected = status.parse::<OrderStatusType>().expect("Unknown order status");
    assert_eq!(order.status, expected);
}

#[then(expr = "the last order generated {int} commissions")]
async fn order_commissions(world: &mut LedgerWorld, count: usize) {
    let order = world.api().order_by_remote_id(&world.last_order()).await.expect("Order not found");
    let commissions = world.api().db().fetch_commissions_for_order(order.id).await.expect("Error fetching commissions");
    assert_eq!(commissions.len(), count);
}

#[then(expr = "the confirmation succeeds")]
async fn confirmation_succeeds(world: &mut LedgerWorld) {
    let results = &world.system().last_results;
    assert_eq!(results.len(), 1);
    assert!(results[0].is_ok(), "Confirmation failed: {:?}", results[0]);
}

#[then(expr = "the confirmation is rejected because the signature is invalid")]
async fn rejected_signature(world: &mut LedgerWorld) {
    let results = &world.system().last_results;
    assert!(matches!(results.as_slice(), [Err(OrderFlowError::InvalidSignature)]), "Got {results:?}");
}

#[then(expr = "the confirmation is rejected because the order is already completed")]
async fn rejected_completed(world: &mut LedgerWorld) {
    let results = &world.system().last_results;
    assert!(matches!(results.as_slice(), [Err(OrderFlowError::AlreadyCompleted(_))]), "Got {results:?}");
}

#[then(expr = "exactly {int} confirmation succeeds and {int} report the order as already completed")]
async fn race_results(world: &mut LedgerWorld, winners: usize, losers: usize) {
    let results = &world.system().last_results;
    let ok = results.iter().filter(|r| r.is_ok()).count();
    let completed = results.iter().filter(|r| matches!(r, Err(OrderFlowError::AlreadyCompleted(_)))).count();
    assert_eq!(ok, winners);
    assert_eq!(completed, losers);
}

#[then(expr = "'{word}' has earned {int} paise from {int} commissions")]
async fn earnings(world: &mut LedgerWorld, name: String, amount: i64, count: i64) {
    let user_id = world.user(&name).id;
    let summary = world.api().db().fetch_earnings_summary(user_id).await.expect("Error fetching earnings");
    assert_eq!(summary.total_earned, Paise::from(amount));
    assert_eq!(summary.total_commissions, count);
}

#[then(expr = "'{word}' holds the {word} package")]
async fn holds_package(world: &mut LedgerWorld, name: String, tier: String) {
    let tier = tier.parse::<PackageTier>().expect("Unknown tier");
    let user_id = world.user(&name).id;
    let user = world.api().db().fetch_user(user_id).await.unwrap().expect("User not found");
    assert_eq!(user.package_tier, Some(tier));
    assert!(user.purchased_at.is_some());
}

#[then(expr = "'{word}' holds no package")]
async fn holds_nothing(world: &mut LedgerWorld, name: String) {
    let user_id = world.user(&name).id;
    let user = world.api().db().fetch_user(user_id).await.unwrap().expect("User not found");
    assert_eq!(user.package_tier, None);
}
