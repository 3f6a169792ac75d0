use crate::storage::StoreError;

use super::value_objects::{OrderId, OrderStatus};

// ============================================================================
// Order Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Unauthorized: order {order_id} belongs to another user")]
    Unauthorized { order_id: OrderId },

    #[error("Cannot move order from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order {0} is already paid")]
    AlreadyPaid(OrderId),

    #[error("Failed to place order: {0}")]
    Creation(#[source] StoreError),

    #[error("Failed to fetch orders: {0}")]
    Fetch(#[source] StoreError),

    #[error("Failed to update order: {0}")]
    Update(#[source] StoreError),

    #[error("Payment failed: {0}")]
    Payment(#[source] StoreError),
}

impl OrderError {
    /// Stable label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::Validation(_) => "validation",
            OrderError::NotFound(_) => "not_found",
            OrderError::Unauthorized { .. } => "unauthorized",
            OrderError::InvalidStatusTransition { .. } => "invalid_transition",
            OrderError::AlreadyPaid(_) => "already_paid",
            OrderError::Creation(_) => "creation",
            OrderError::Fetch(_) => "fetch",
            OrderError::Update(_) => "update",
            OrderError::Payment(_) => "payment",
        }
    }
}
