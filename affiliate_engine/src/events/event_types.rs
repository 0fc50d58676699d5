use serde::Serialize;

use crate::db_types::{Commission, Order};

/// Emitted once per order, after the settlement transaction has committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCompletedEvent {
    pub order: Order,
    pub commissions: Vec<Commission>,
}

impl OrderCompletedEvent {
    pub fn new(order: Order, commissions: Vec<Commission>) -> Self {
        Self { order, commissions }
    }
}

/// Emitted for each commission record created by a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommissionEarnedEvent {
    /// The user whose purchase generated the commission
    pub buyer_id: i64,
    pub commission: Commission,
}

impl CommissionEarnedEvent {
    pub fn new(buyer_id: i64, commission: Commission) -> Self {
        Self { buyer_id, commission }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    OrderCompleted(OrderCompletedEvent),
    CommissionEarned(CommissionEarnedEvent),
}
