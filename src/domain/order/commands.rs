use crate::storage::StoreError;

use super::errors::OrderError;
use super::value_objects::{OrderStatus, PaymentMethod};

// ============================================================================
// Order Commands - mutations a customer can request on an existing order
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCommand {
    UpdateStatus { status: OrderStatus },
    Pay { method: PaymentMethod },
}

impl OrderCommand {
    /// Wrap a storage failure in the error class of this command
    pub(crate) fn storage_error(&self, source: StoreError) -> OrderError {
        match self {
            OrderCommand::UpdateStatus { .. } => OrderError::Update(source),
            OrderCommand::Pay { .. } => OrderError::Payment(source),
        }
    }

    pub(crate) fn success_message(&self) -> &'static str {
        match self {
            OrderCommand::UpdateStatus { .. } => "Order updated successfully",
            OrderCommand::Pay {
                method: PaymentMethod::CashOnDelivery,
            } => "Order confirmed, pay on delivery",
            OrderCommand::Pay { .. } => "Payment successful",
        }
    }
}
