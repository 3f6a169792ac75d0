use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::auth::UserId;

use super::commands::OrderCommand;
use super::errors::OrderError;
use super::value_objects::{
    FuelType, OrderAction, OrderId, OrderStatus, PaymentMethod, PaymentStatus, TransitionPolicy,
};

/// Version written by this crate. Version 1 records predate `paymentMethod`.
pub const ORDER_SCHEMA_VERSION: u16 = 2;

fn legacy_schema_version() -> u16 {
    1
}

// ============================================================================
// Fuel Order - persisted record and its lifecycle rules
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelOrder {
    // Identity
    pub id: OrderId,
    pub user_id: UserId,

    // What was ordered, priced at order time
    pub fuel_type: FuelType,
    pub quantity: Decimal,
    pub total_price: Decimal,
    pub delivery_address: String,

    // Lifecycle
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    // Audit Trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default = "legacy_schema_version")]
    pub schema_version: u16,
}

impl FuelOrder {
    /// A fresh pending order. Choosing a non-cash method upfront marks it paid.
    pub(crate) fn place(
        user_id: UserId,
        fuel_type: FuelType,
        quantity: Decimal,
        total_price: Decimal,
        delivery_address: String,
        payment_method: Option<PaymentMethod>,
        now: DateTime<Utc>,
    ) -> Self {
        let payment_status = payment_method
            .map(|m| m.resulting_payment_status())
            .unwrap_or(PaymentStatus::Unpaid);

        Self {
            id: OrderId::generate(),
            user_id,
            fuel_type,
            quantity,
            total_price,
            delivery_address,
            status: OrderStatus::Pending,
            payment_status,
            payment_method,
            created_at: now,
            updated_at: now,
            schema_version: ORDER_SCHEMA_VERSION,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    /// Apply a command in place, refreshing `updated_at`
    ///
    /// Under `Permissive` nothing is checked, matching clients that let any
    /// status be written. On error the order is left untouched.
    pub fn handle_command(
        &mut self,
        command: &OrderCommand,
        policy: TransitionPolicy,
        now: DateTime<Utc>,
    ) -> Result<(), OrderError> {
        match command {
            OrderCommand::UpdateStatus { status } => {
                if policy == TransitionPolicy::Strict && !self.status.can_transition_to(*status) {
                    return Err(OrderError::InvalidStatusTransition {
                        from: self.status,
                        to: *status,
                    });
                }

                self.status = *status;
            }

            OrderCommand::Pay { method } => {
                if policy == TransitionPolicy::Strict {
                    if self.status != OrderStatus::Pending {
                        return Err(OrderError::InvalidStatusTransition {
                            from: self.status,
                            to: OrderStatus::Processing,
                        });
                    }
                    if self.payment_status == PaymentStatus::Paid {
                        return Err(OrderError::AlreadyPaid(self.id.clone()));
                    }
                }

                self.payment_status = method.resulting_payment_status();
                self.payment_method = Some(*method);
                self.status = OrderStatus::Processing;
            }
        }

        self.updated_at = now;
        self.schema_version = ORDER_SCHEMA_VERSION;
        Ok(())
    }

    /// What the history view offers for this order
    pub fn available_actions(&self) -> Vec<OrderAction> {
        match (self.status, self.payment_status) {
            (OrderStatus::Pending, PaymentStatus::Unpaid) => vec![OrderAction::Cancel, OrderAction::Pay],
            (OrderStatus::Pending, PaymentStatus::Paid) => vec![OrderAction::Cancel],
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
