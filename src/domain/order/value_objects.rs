use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Opaque order identifier
///
/// New ids are UUIDv7 strings, so lexical order follows creation time.
/// Records written by older clients may carry any other string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Premium,
}

impl FuelType {
    pub const ALL: [FuelType; 3] = [FuelType::Petrol, FuelType::Diesel, FuelType::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Premium => "premium",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "petrol" => Ok(FuelType::Petrol),
            "diesel" => Ok(FuelType::Diesel),
            "premium" => Ok(FuelType::Premium),
            other => Err(OrderError::Validation(format!("Unknown fuel type: {other}"))),
        }
    }
}

/// Delivery lifecycle
///
/// `Pending → Processing → Delivered`, or `Pending → Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Processing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Processing, OrderStatus::Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(OrderError::Validation(format!("Unknown order status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[serde(rename = "phonepe")]
    PhonePe,
    CreditCard,
    DebitCard,
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::PhonePe => "phonepe",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
        }
    }

    /// Cash is collected at the door, so the order stays unpaid until then
    pub fn resulting_payment_status(&self) -> PaymentStatus {
        match self {
            PaymentMethod::CashOnDelivery => PaymentStatus::Unpaid,
            _ => PaymentStatus::Paid,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phonepe" => Ok(PaymentMethod::PhonePe),
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "cash_on_delivery" => Ok(PaymentMethod::CashOnDelivery),
            other => Err(OrderError::Validation(format!("Unknown payment method: {other}"))),
        }
    }
}

/// Whether status/payment changes are checked against the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Only lifecycle edges are allowed; payment only on pending, unpaid orders
    #[default]
    Strict,
    /// Any status may be written at any time
    Permissive,
}

impl TransitionPolicy {
    pub fn from_enforcement(enforce: bool) -> Self {
        if enforce {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        }
    }
}

/// Actions a customer may take on an order from the history view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Cancel,
    Pay,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_order_ids_are_unique_and_ordered() {
        let first = OrderId::generate();
        let second = OrderId::generate();

        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn test_order_id_serializes_as_plain_string() {
        let id = OrderId::from("order-1700000000000-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""order-1700000000000-42""#);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&FuelType::Petrol).unwrap(), r#""petrol""#);
        assert_eq!(serde_json::to_string(&OrderStatus::Cancelled).unwrap(), r#""cancelled""#);
        assert_eq!(serde_json::to_string(&PaymentStatus::Unpaid).unwrap(), r#""unpaid""#);
        assert_eq!(serde_json::to_string(&PaymentMethod::PhonePe).unwrap(), r#""phonepe""#);
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            r#""cash_on_delivery""#
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Diesel".parse::<FuelType>().unwrap(), FuelType::Diesel);
        assert_eq!(" PROCESSING ".parse::<OrderStatus>().unwrap(), OrderStatus::Processing);
        assert_eq!("credit_card".parse::<PaymentMethod>().unwrap(), PaymentMethod::CreditCard);
        assert!(matches!("kerosene".parse::<FuelType>(), Err(OrderError::Validation(_))));
    }

    #[test]
    fn test_lifecycle_edges() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Delivered));

        assert!(!Processing.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Processing));

        assert!(Delivered.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Processing.is_terminal());
    }

    #[test]
    fn test_cash_on_delivery_stays_unpaid() {
        assert_eq!(PaymentMethod::CashOnDelivery.resulting_payment_status(), PaymentStatus::Unpaid);
        assert_eq!(PaymentMethod::PhonePe.resulting_payment_status(), PaymentStatus::Paid);
        assert_eq!(PaymentMethod::CreditCard.resulting_payment_status(), PaymentStatus::Paid);
        assert_eq!(PaymentMethod::DebitCard.resulting_payment_status(), PaymentStatus::Paid);
    }

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(TransitionPolicy::from_enforcement(true), TransitionPolicy::Strict);
        assert_eq!(TransitionPolicy::from_enforcement(false), TransitionPolicy::Permissive);
        assert_eq!(TransitionPolicy::default(), TransitionPolicy::Strict);
    }
}
