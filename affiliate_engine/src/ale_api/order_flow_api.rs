use std::fmt::Debug;

use affiliate_common::INR_CURRENCY_CODE;
use chrono::Utc;
use log::*;

use crate::{
    ale_api::{
        errors::OrderFlowError,
        order_objects::{receipt_reference, ConfirmedOrder, OpenedOrder},
    },
    db_types::{NewOrder, Order, PackageTier},
    events::{CommissionEarnedEvent, EventProducers, OrderCompletedEvent},
    traits::{LedgerDatabase, PaymentConfirmation, PaymentGateway, RemotePayment, SettledOrder},
};

/// `OrderFlowApi` is the settlement engine. It opens orders at the payment gateway, and turns verified payment
/// confirmations into completed orders, package entitlements and referral commissions.
pub struct OrderFlowApi<B, G> {
    db: B,
    gateway: G,
    producers: EventProducers,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(db: B, gateway: G, producers: EventProducers) -> Self {
        Self { db, gateway, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: LedgerDatabase,
    G: PaymentGateway,
{
    /// Opens a new order for `user_id` to buy the `tier` package.
    ///
    /// A payment intent for the package's final price is created at the gateway, and a matching `pending` order is
    /// recorded. Every call opens a fresh order; abandoned orders simply stay `pending`.
    pub async fn open_order(&self, user_id: i64, tier: PackageTier) -> Result<OpenedOrder, OrderFlowError> {
        let user = self.db.fetch_user(user_id).await?.ok_or(OrderFlowError::UserNotFound(user_id))?;
        let package = self.db.fetch_package_by_tier(tier).await?.ok_or(OrderFlowError::PackageNotFound(tier))?;
        let amount = package.final_price();
        let receipt = receipt_reference(user.id, Utc::now().timestamp());
        trace!("🔄️ Requesting a {amount} gateway order for user #{user_id} ({tier})");
        let remote = self.gateway.create_remote_order(amount, INR_CURRENCY_CODE, &receipt).await.map_err(|e| {
            warn!("🔄️💳️ Could not create a gateway order for user #{user_id}. {e}");
            OrderFlowError::Gateway(e)
        })?;
        let new_order = NewOrder {
            user_id: user.id,
            package_id: package.id,
            remote_order_id: remote.id.clone(),
            amount,
            currency: INR_CURRENCY_CODE.to_string(),
            receipt,
        };
        let order = self.db.insert_order(new_order).await?;
        debug!("🔄️ Order #{} [{}] opened for user #{user_id}. {tier} @ {amount}", order.id, order.remote_order_id);
        Ok(OpenedOrder {
            remote_order_id: order.remote_order_id,
            amount,
            currency: order.currency,
            gateway_public_key: self.gateway.public_key().to_string(),
            tier,
            package_name: package.name,
        })
    }

    /// Confirms payment for an order.
    ///
    /// The signature is checked first. If it does not verify, nothing is touched and
    /// [`OrderFlowError::InvalidSignature`] is returned. Otherwise the order is settled in a single transaction (see
    /// [`LedgerDatabase::settle_order`]), and once that has committed, the completion hooks are notified.
    ///
    /// Confirming an order a second time returns [`OrderFlowError::AlreadyCompleted`] and changes nothing, which makes
    /// it safe for clients to retry.
    pub async fn confirm_order(&self, confirmation: PaymentConfirmation) -> Result<ConfirmedOrder, OrderFlowError> {
        self.verify_signature(&confirmation)?;
        self.settle(confirmation).await
    }

    /// As [`Self::confirm_order`], but only for an order that belongs to `user_id`.
    ///
    /// The signature is still checked before anything else, so a forged confirmation is always reported as
    /// [`OrderFlowError::InvalidSignature`]. Someone else's order is reported as [`OrderFlowError::OrderNotFound`].
    pub async fn confirm_order_for_user(
        &self,
        user_id: i64,
        confirmation: PaymentConfirmation,
    ) -> Result<ConfirmedOrder, OrderFlowError> {
        self.verify_signature(&confirmation)?;
        let order = self.order_by_remote_id(&confirmation.remote_order_id).await?;
        if order.user_id != user_id {
            info!(
                "🔄️ User #{user_id} tried to confirm order [{}], which belongs to user #{}",
                order.remote_order_id, order.user_id
            );
            return Err(OrderFlowError::OrderNotFound(confirmation.remote_order_id));
        }
        self.settle(confirmation).await
    }

    pub async fn order_by_remote_id(&self, remote_order_id: &str) -> Result<Order, OrderFlowError> {
        self.db
            .fetch_order_by_remote_id(remote_order_id)
            .await?
            .ok_or_else(|| OrderFlowError::OrderNotFound(remote_order_id.to_string()))
    }

    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderFlowError> {
        let orders = self.db.fetch_orders_for_user(user_id).await?;
        Ok(orders)
    }

    /// The gateway's record of a payment. For support and audit only; settlement never depends on it.
    pub async fn fetch_remote_payment(&self, remote_payment_id: &str) -> Result<RemotePayment, OrderFlowError> {
        let payment = self.gateway.fetch_remote_payment(remote_payment_id).await?;
        Ok(payment)
    }

    fn verify_signature(&self, confirmation: &PaymentConfirmation) -> Result<(), OrderFlowError> {
        let PaymentConfirmation { remote_order_id, remote_payment_id, signature } = confirmation;
        if !self.gateway.verify_signature(remote_order_id, remote_payment_id, signature) {
            warn!(
                "🔄️🔐️ Payment signature verification FAILED for order [{remote_order_id}] and payment \
                 [{remote_payment_id}]. This could be an attempt to forge a payment."
            );
            return Err(OrderFlowError::InvalidSignature);
        }
        trace!("🔄️🔐️ Payment signature for order [{remote_order_id}] is valid");
        Ok(())
    }

    async fn settle(&self, confirmation: PaymentConfirmation) -> Result<ConfirmedOrder, OrderFlowError> {
        let remote_order_id = confirmation.remote_order_id.as_str();
        let settled = self.db.settle_order(&confirmation).await.map_err(|e| {
            debug!("🔄️ Order [{remote_order_id}] was not settled. {e}");
            OrderFlowError::from(e)
        })?;
        info!(
            "🔄️✅️ Order #{} [{remote_order_id}] completed. {} commissions recorded.",
            settled.order.id,
            settled.commissions.len()
        );
        self.call_order_completed_hook(&settled).await;
        self.call_commission_earned_hook(&settled).await;
        let SettledOrder { order, commissions } = settled;
        Ok(ConfirmedOrder::new(order.id, order.status, commissions))
    }

    async fn call_order_completed_hook(&self, settled: &SettledOrder) {
        for emitter in &self.producers.order_completed_producer {
            debug!("🔄️📬️ Notifying order completed hook subscribers");
            let event = OrderCompletedEvent::new(settled.order.clone(), settled.commissions.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_commission_earned_hook(&self, settled: &SettledOrder) {
        for emitter in &self.producers.commission_earned_producer {
            debug!("🔄️📬️ Notifying commission earned hook subscribers");
            for commission in &settled.commissions {
                let event = CommissionEarnedEvent::new(settled.order.user_id, commission.clone());
                emitter.publish_event(event).await;
            }
        }
    }
}
